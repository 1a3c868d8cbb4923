use std::sync::{Arc, Once};

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::PreloadOptions;
use crate::engine::preloader::Preloader;
use crate::source::http_source::HttpSource;
use crate::source::traits::{ImageList, LoadedImage};

static INIT_TRACING: Once = Once::new();

/// Install a fmt subscriber honoring `RUST_LOG`. Safe to call more than once.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();

        info!("image preload tracing initialized");
    });
}

/// Preload one or many image urls over HTTP with default headers.
pub async fn preload_images(
    images: impl Into<ImageList>,
    options: PreloadOptions,
) -> Vec<LoadedImage> {
    Preloader::new(Arc::new(HttpSource::default()))
        .preload(images, &options)
        .await
}
