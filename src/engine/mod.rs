// Engine orchestration — batch lifecycle, chunked loading and notifications.

pub mod chunks;
pub mod loader;
pub mod observer;
pub mod preloader;
pub mod scheduler;
pub mod state;
