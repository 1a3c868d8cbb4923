// Batch load orchestration — bounded-concurrency chunks or strict sequence, per-item timeouts.

use futures::future::join_all;
use tracing::{debug, warn};

use super::chunks::chunk_ranges;
use super::observer::PreloadObserver;
use super::state::BatchState;
use crate::config::{LoadConfig, LoadStrategy};
use crate::error::PreloadError;
use crate::source::traits::{ImageSource, LoadRequest, LoadedImage};

/// Runs one batch against a source. Borrowed pieces are owned by the caller so the
/// accumulated state outlives an aborted run.
pub struct BatchLoader<'a> {
    source: &'a dyn ImageSource,
    config: &'a LoadConfig,
    observer: &'a dyn PreloadObserver,
    state: &'a BatchState,
}

impl<'a> BatchLoader<'a> {
    pub fn new(
        source: &'a dyn ImageSource,
        config: &'a LoadConfig,
        observer: &'a dyn PreloadObserver,
        state: &'a BatchState,
    ) -> Self {
        Self {
            source,
            config,
            observer,
            state,
        }
    }

    /// Load every url with the configured strategy. Returns the successes only.
    pub async fn run(&self, urls: &[String]) -> Vec<LoadedImage> {
        match self.config.strategy {
            LoadStrategy::Parallel => self.load_parallel(urls).await,
            LoadStrategy::Sequential => self.load_sequential(urls).await,
        }
    }

    /// Load a single url, racing it against the per-item timeout when one is set.
    ///
    /// Success is recorded and reported as progress; failure is reported to the
    /// error callback. The losing side of the race is dropped and never observed.
    pub async fn load_one(&self, url: &str) -> Result<LoadedImage, PreloadError> {
        let request = LoadRequest {
            url: url.to_string(),
            cross_origin: self.config.cross_origin,
        };

        self.state.begin_load();
        let outcome = match self.config.timeout {
            Some(timeout) => {
                tokio::select! {
                    result = self.source.load(&request) => result.map_err(|source| PreloadError::Fetch {
                        url: url.to_string(),
                        source,
                    }),
                    _ = tokio::time::sleep(timeout) => Err(PreloadError::Timeout {
                        url: url.to_string(),
                        timeout_ms: timeout.as_millis() as u64,
                    }),
                }
            }
            None => self
                .source
                .load(&request)
                .await
                .map_err(|source| PreloadError::Fetch {
                    url: url.to_string(),
                    source,
                }),
        };
        self.state.end_load();

        match outcome {
            Ok(image) => {
                let loaded = self.state.record_loaded(image.clone());
                debug!("image {} loaded ({}/{})", url, loaded, self.state.total());
                self.observer.on_progress(loaded, self.state.total());
                Ok(image)
            }
            Err(e) => {
                self.state.record_failed();
                match &e {
                    PreloadError::Fetch { source, .. } => warn!("{}: {:#}", e, source),
                    PreloadError::Timeout { .. } => warn!("{}", e),
                }
                self.observer.on_error(&e, url);
                Err(e)
            }
        }
    }

    /// Consecutive chunks of `max_concurrent`; each chunk fully settles before the next
    /// starts. Successes keep submission order within and across chunks.
    async fn load_parallel(&self, urls: &[String]) -> Vec<LoadedImage> {
        let mut results = Vec::with_capacity(urls.len());

        for range in chunk_ranges(urls.len(), self.config.max_concurrent) {
            debug!("chunk [{}, {}) starting", range.start, range.end);
            let outcomes = join_all(urls[range].iter().map(|url| self.load_one(url))).await;
            results.extend(outcomes.into_iter().filter_map(Result::ok));
        }

        results
    }

    async fn load_sequential(&self, urls: &[String]) -> Vec<LoadedImage> {
        let mut results = Vec::with_capacity(urls.len());

        for url in urls {
            // Failures were already reported by load_one.
            if let Ok(image) = self.load_one(url).await {
                results.push(image);
            }
        }

        results
    }
}
