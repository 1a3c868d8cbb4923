// Per-batch bookkeeping — successful handles plus load counters.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::source::traits::LoadedImage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSnapshot {
    pub total: usize,
    pub loaded: usize,
    pub failed: usize,
    pub in_flight: u32,
    pub peak_in_flight: u32,
    pub elapsed: Duration,
}

/// State owned by a single batch. The loaded count is derived from the handle
/// list, so the two cannot drift apart.
pub struct BatchState {
    total: usize,
    loaded: Mutex<Vec<LoadedImage>>,
    failed: AtomicUsize,
    in_flight: AtomicU32,
    peak_in_flight: AtomicU32,
    started: Instant,
}

impl BatchState {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            loaded: Mutex::new(Vec::with_capacity(total)),
            failed: AtomicUsize::new(0),
            in_flight: AtomicU32::new(0),
            peak_in_flight: AtomicU32::new(0),
            started: Instant::now(),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Append a successful handle and return the new loaded count.
    pub fn record_loaded(&self, image: LoadedImage) -> usize {
        let mut loaded = self.loaded.lock();
        loaded.push(image);
        loaded.len()
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn begin_load(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::Relaxed);
    }

    pub fn end_load(&self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.lock().len()
    }

    /// Copy of the handles accumulated so far, in the order they were recorded.
    pub fn loaded_images(&self) -> Vec<LoadedImage> {
        self.loaded.lock().clone()
    }

    pub fn snapshot(&self) -> BatchSnapshot {
        BatchSnapshot {
            total: self.total,
            loaded: self.loaded_count(),
            failed: self.failed.load(Ordering::Relaxed),
            in_flight: self.in_flight.load(Ordering::Relaxed),
            peak_in_flight: self.peak_in_flight.load(Ordering::Relaxed),
            elapsed: self.started.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::traits::LoadRequest;

    fn image(url: &str) -> LoadedImage {
        LoadedImage::empty(&LoadRequest {
            url: url.to_string(),
            cross_origin: None,
        })
    }

    #[test]
    fn test_batch_state_basic() {
        let state = BatchState::new(4);
        assert_eq!(state.record_loaded(image("a")), 1);
        assert_eq!(state.record_loaded(image("b")), 2);
        state.record_failed();

        state.begin_load();
        state.begin_load();
        state.end_load();
        state.begin_load();
        state.end_load();
        state.end_load();

        let snap = state.snapshot();
        assert_eq!(snap.total, 4);
        assert_eq!(snap.loaded, 2);
        assert_eq!(snap.failed, 1);
        assert_eq!(snap.in_flight, 0);
        assert_eq!(snap.peak_in_flight, 2);

        let urls: Vec<_> = state.loaded_images().into_iter().map(|i| i.url).collect();
        assert_eq!(urls, vec!["a", "b"]);
    }
}
