//! Batch image preloading with bounded concurrency, per-item timeouts and
//! optional idle-deferred start.
//!
//! ```no_run
//! use image_preload_engine::{preload_images, PreloadOptions};
//!
//! # async fn demo() {
//! let options = PreloadOptions::default()
//!     .on_progress(|loaded, total| println!("{loaded}/{total}"));
//! let images = preload_images(["https://example.com/a.png", "https://example.com/b.png"], options).await;
//! # let _ = images;
//! # }
//! ```

pub mod api;
pub mod config;
pub mod detect;
pub mod engine;
pub mod error;
pub mod source;

pub use api::simple::{init_tracing, preload_images};
pub use config::{CrossOrigin, LoadConfig, LoadStrategy, PreloadOptions};
pub use engine::observer::{EventChannel, PreloadEvent, PreloadHooks, PreloadObserver};
pub use engine::preloader::Preloader;
pub use engine::scheduler::{IdleNotifier, IdleSignal};
pub use error::PreloadError;
pub use source::traits::{ImageList, ImageSource, LoadRequest, LoadedImage};
