// Batch notifications — progress, per-item errors and completion.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::PreloadError;
use crate::source::traits::LoadedImage;

/// Receives batch notifications.
///
/// For one batch of `total` requests the loader calls `on_progress` once per
/// successful item with a strictly increasing count, `on_error` once per failed
/// item, and `on_complete` exactly once at the end.
pub trait PreloadObserver: Send + Sync {
    fn on_progress(&self, _loaded: usize, _total: usize) {}

    fn on_error(&self, _error: &PreloadError, _url: &str) {}

    fn on_complete(&self, _images: &[LoadedImage]) {}
}

type CompleteFn = Arc<dyn Fn(&[LoadedImage]) + Send + Sync>;
type ErrorFn = Arc<dyn Fn(&PreloadError, &str) + Send + Sync>;
type ProgressFn = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Optional callback closures, as carried by `PreloadOptions`.
#[derive(Clone, Default)]
pub struct PreloadHooks {
    on_complete: Option<CompleteFn>,
    on_error: Option<ErrorFn>,
    on_progress: Option<ProgressFn>,
}

impl PreloadHooks {
    pub fn with_on_complete<F>(mut self, f: F) -> Self
    where
        F: Fn(&[LoadedImage]) + Send + Sync + 'static,
    {
        self.on_complete = Some(Arc::new(f));
        self
    }

    pub fn with_on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&PreloadError, &str) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(f));
        self
    }

    pub fn with_on_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for PreloadHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreloadHooks")
            .field("on_complete", &self.on_complete.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

impl PreloadObserver for PreloadHooks {
    fn on_progress(&self, loaded: usize, total: usize) {
        if let Some(f) = &self.on_progress {
            f(loaded, total);
        }
    }

    fn on_error(&self, error: &PreloadError, url: &str) {
        if let Some(f) = &self.on_error {
            f(error, url);
        }
    }

    fn on_complete(&self, images: &[LoadedImage]) {
        if let Some(f) = &self.on_complete {
            f(images);
        }
    }
}

#[derive(Debug)]
pub enum PreloadEvent {
    Progress { loaded: usize, total: usize },
    /// Errors are forwarded by message since `PreloadError` is not `Clone`.
    Error { url: String, message: String, timeout: bool },
    Complete { images: Vec<LoadedImage> },
}

/// Forwards notifications into an mpsc channel for callers that prefer a stream.
pub struct EventChannel {
    tx: mpsc::UnboundedSender<PreloadEvent>,
}

impl EventChannel {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PreloadEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: PreloadEvent) {
        // A dropped receiver just means nobody is listening any more.
        let _ = self.tx.send(event);
    }
}

impl PreloadObserver for EventChannel {
    fn on_progress(&self, loaded: usize, total: usize) {
        self.send(PreloadEvent::Progress { loaded, total });
    }

    fn on_error(&self, error: &PreloadError, url: &str) {
        self.send(PreloadEvent::Error {
            url: url.to_string(),
            message: error.to_string(),
            timeout: error.is_timeout(),
        });
    }

    fn on_complete(&self, images: &[LoadedImage]) {
        self.send(PreloadEvent::Complete {
            images: images.to_vec(),
        });
    }
}
