use thiserror::Error;

/// Why a single image in a batch failed. Never escapes the batch; it is only
/// handed to the error callback.
#[derive(Debug, Error)]
pub enum PreloadError {
    #[error("Failed to load image: {url}")]
    Fetch {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Image load timeout after {timeout_ms}ms: {url}")]
    Timeout { url: String, timeout_ms: u64 },
}

impl PreloadError {
    pub fn url(&self) -> &str {
        match self {
            Self::Fetch { url, .. } | Self::Timeout { url, .. } => url,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
