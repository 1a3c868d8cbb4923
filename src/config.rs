use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;
use tracing::warn;

use crate::engine::observer::PreloadHooks;
use crate::error::PreloadError;
use crate::source::traits::LoadedImage;

/// Default chunk size for the parallel strategy.
pub const DEFAULT_MAX_CONCURRENT: usize = 6;

/// Default upper bound on how long an idle-deferred batch waits for the host (2 s).
pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 2_000;

/// Cross-origin mode applied to each request when `cross_origin` is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrossOrigin {
    #[default]
    Anonymous,
    UseCredentials,
}

impl CrossOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::UseCredentials => "use-credentials",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStrategy {
    /// Consecutive chunks of `max_concurrent` items, each chunk loaded concurrently.
    #[default]
    Parallel,
    /// One item at a time, in submission order.
    Sequential,
}

/// Caller-facing preload options. Every field is optional when deserialized.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreloadOptions {
    pub cross_origin: bool,
    pub cross_origin_attribute: CrossOrigin,
    pub max_concurrent: usize,
    pub strategy: LoadStrategy,
    /// Per-item timeout in milliseconds; 0 disables it.
    #[serde(alias = "timeout")]
    pub timeout_ms: u64,
    pub load_on_idle: bool,
    pub idle_timeout_ms: u64,
    #[serde(skip)]
    pub hooks: PreloadHooks,
}

impl Default for PreloadOptions {
    fn default() -> Self {
        Self {
            cross_origin: false,
            cross_origin_attribute: CrossOrigin::Anonymous,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            strategy: LoadStrategy::Parallel,
            timeout_ms: 0,
            load_on_idle: false,
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
            hooks: PreloadHooks::default(),
        }
    }
}

impl std::fmt::Debug for PreloadOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreloadOptions")
            .field("cross_origin", &self.cross_origin)
            .field("cross_origin_attribute", &self.cross_origin_attribute)
            .field("max_concurrent", &self.max_concurrent)
            .field("strategy", &self.strategy)
            .field("timeout_ms", &self.timeout_ms)
            .field("load_on_idle", &self.load_on_idle)
            .field("idle_timeout_ms", &self.idle_timeout_ms)
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl PreloadOptions {
    /// Parse options from a JSON object such as `{"maxConcurrent": 2, "strategy": "sequential"}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: Fn(&[LoadedImage]) + Send + Sync + 'static,
    {
        self.hooks = self.hooks.with_on_complete(f);
        self
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&PreloadError, &str) + Send + Sync + 'static,
    {
        self.hooks = self.hooks.with_on_error(f);
        self
    }

    pub fn on_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.hooks = self.hooks.with_on_progress(f);
        self
    }

    /// Snapshot the options into the immutable config a single batch runs with.
    pub fn resolve(&self) -> LoadConfig {
        let max_concurrent = if self.max_concurrent == 0 {
            warn!("max_concurrent of 0 is invalid, using 1");
            1
        } else {
            self.max_concurrent
        };

        LoadConfig {
            cross_origin: self.cross_origin.then_some(self.cross_origin_attribute),
            max_concurrent,
            strategy: self.strategy,
            timeout: (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms)),
            load_on_idle: self.load_on_idle,
            idle_timeout: Duration::from_millis(self.idle_timeout_ms),
        }
    }
}

/// Resolved, validated configuration for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadConfig {
    /// `Some` only when cross-origin requests are enabled.
    pub cross_origin: Option<CrossOrigin>,
    /// Always at least 1.
    pub max_concurrent: usize,
    pub strategy: LoadStrategy,
    pub timeout: Option<Duration>,
    pub load_on_idle: bool,
    pub idle_timeout: Duration,
}

impl Default for LoadConfig {
    fn default() -> Self {
        PreloadOptions::default().resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PreloadOptions::default().resolve();
        assert_eq!(config.cross_origin, None);
        assert_eq!(config.max_concurrent, 6);
        assert_eq!(config.strategy, LoadStrategy::Parallel);
        assert_eq!(config.timeout, None);
        assert!(!config.load_on_idle);
        assert_eq!(config.idle_timeout, Duration::from_millis(DEFAULT_IDLE_TIMEOUT_MS));
    }

    #[test]
    fn test_from_json_partial() {
        let opts = PreloadOptions::from_json(
            r#"{"crossOrigin": true, "crossOriginAttribute": "use-credentials",
                "strategy": "sequential", "timeout": 250}"#,
        )
        .unwrap();
        assert_eq!(opts.max_concurrent, DEFAULT_MAX_CONCURRENT);

        let config = opts.resolve();
        assert_eq!(config.cross_origin, Some(CrossOrigin::UseCredentials));
        assert_eq!(config.strategy, LoadStrategy::Sequential);
        assert_eq!(config.timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_from_json_rejects_unknown_strategy() {
        assert!(PreloadOptions::from_json(r#"{"strategy": "random"}"#).is_err());
    }

    #[test]
    fn test_zero_max_concurrent_clamped() {
        let opts = PreloadOptions {
            max_concurrent: 0,
            ..Default::default()
        };
        assert_eq!(opts.resolve().max_concurrent, 1);
    }

    #[test]
    fn test_cross_origin_attribute_ignored_when_disabled() {
        let opts = PreloadOptions {
            cross_origin_attribute: CrossOrigin::UseCredentials,
            ..Default::default()
        };
        assert_eq!(opts.resolve().cross_origin, None);
    }
}
