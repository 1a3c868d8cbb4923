// Fetch primitives — pluggable backends that turn a URL into a loaded image.

pub mod http_source;
pub mod traits;
