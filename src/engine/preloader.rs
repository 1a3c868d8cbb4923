// Preload entry point — resolves options, defers the start, runs the batch, reports completion.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{error, info};

use super::loader::BatchLoader;
use super::observer::PreloadObserver;
use super::scheduler::{select_scheduler, IdleSignal};
use super::state::BatchState;
use crate::config::PreloadOptions;
use crate::source::traits::{ImageList, ImageSource, LoadedImage};

/// Preloads batches of images from one source. Calls are independent of each
/// other and may run concurrently.
#[derive(Clone)]
pub struct Preloader {
    source: Arc<dyn ImageSource>,
    idle: Option<Arc<dyn IdleSignal>>,
}

impl Preloader {
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        Self { source, idle: None }
    }

    /// Provide the host's idle capability, used when `load_on_idle` is set.
    pub fn with_idle_signal(mut self, idle: Arc<dyn IdleSignal>) -> Self {
        self.idle = Some(idle);
        self
    }

    /// Preload `images`, notifying the hooks in `options`. Never fails: the
    /// returned list holds every image that loaded.
    pub async fn preload(
        &self,
        images: impl Into<ImageList>,
        options: &PreloadOptions,
    ) -> Vec<LoadedImage> {
        self.preload_with_observer(images, options, &options.hooks)
            .await
    }

    /// Like [`Preloader::preload`], with notifications sent to `observer`
    /// instead of `options.hooks`.
    pub async fn preload_with_observer(
        &self,
        images: impl Into<ImageList>,
        options: &PreloadOptions,
        observer: &dyn PreloadObserver,
    ) -> Vec<LoadedImage> {
        let urls = images.into().into_vec();
        let config = options.resolve();
        let state = BatchState::new(urls.len());
        let scheduler = select_scheduler(&config, self.idle.clone());

        let batch = async {
            if let Some(scheduler) = &scheduler {
                scheduler.until_start().await;
            }
            info!(
                "batch start: {} images strategy={:?} max_concurrent={} timeout={:?}",
                urls.len(),
                config.strategy,
                config.max_concurrent,
                config.timeout
            );
            BatchLoader::new(self.source.as_ref(), &config, observer, &state)
                .run(&urls)
                .await
        };

        let images = match AssertUnwindSafe(batch).catch_unwind().await {
            Ok(images) => images,
            Err(panic) => {
                error!(
                    "batch aborted by internal fault: {}",
                    panic_message(panic.as_ref())
                );
                state.loaded_images()
            }
        };

        let snap = state.snapshot();
        info!(
            "batch done: loaded={} failed={} total={} peak_in_flight={} elapsed={:?}",
            images.len(),
            snap.failed,
            snap.total,
            snap.peak_in_flight,
            snap.elapsed
        );

        observer.on_complete(&images);
        images
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
