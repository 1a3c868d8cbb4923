// Scripted in-memory image source shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;

use image_preload_engine::{ImageSource, LoadRequest, LoadedImage};

/// Settle latency for every scripted load.
pub const SETTLE_MS: u64 = 10;

/// Behaves by url: `valid*` loads after `SETTLE_MS`, `error*` fails after
/// `SETTLE_MS`, `timeout*` never settles, `panic*` panics.
#[derive(Default)]
pub struct ScriptedSource {
    in_flight: AtomicU32,
    peak_in_flight: AtomicU32,
    started: Mutex<Vec<String>>,
    requests: Mutex<Vec<LoadRequest>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn peak_in_flight(&self) -> u32 {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().clone()
    }

    pub fn requests(&self) -> Vec<LoadRequest> {
        self.requests.lock().clone()
    }
}

struct InFlight<'a>(&'a AtomicU32);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ImageSource for ScriptedSource {
    async fn load(&self, request: &LoadRequest) -> Result<LoadedImage> {
        self.started.lock().push(request.url.clone());
        self.requests.lock().push(request.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if request.url.contains("panic") {
            panic!("scripted panic for {}", request.url);
        }
        if request.url.contains("timeout") {
            std::future::pending::<()>().await;
        }

        tokio::time::sleep(Duration::from_millis(SETTLE_MS)).await;

        if request.url.contains("valid") {
            Ok(LoadedImage::empty(request))
        } else {
            Err(anyhow!("scripted failure"))
        }
    }
}

pub fn urls(images: &[LoadedImage]) -> Vec<&str> {
    images.iter().map(|i| i.url.as_str()).collect()
}
