// Batch start deferral — wait for the host to go idle, or fall back to the next tick.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use tracing::debug;

use crate::config::LoadConfig;

/// Host capability reporting that it has spare cycles.
#[async_trait]
pub trait IdleSignal: Send + Sync {
    /// Resolve once the host is idle.
    async fn idle(&self);
}

/// `IdleSignal` driven by the host calling [`IdleNotifier::notify_idle`].
///
/// A notification sent while nobody is waiting is kept for the next waiter.
#[derive(Default)]
pub struct IdleNotifier {
    notify: Notify,
}

impl IdleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify_idle(&self) {
        self.notify.notify_one();
    }
}

#[async_trait]
impl IdleSignal for IdleNotifier {
    async fn idle(&self) {
        self.notify.notified().await;
    }
}

/// Decides when a batch may start.
#[async_trait]
pub trait StartScheduler: Send + Sync {
    async fn until_start(&self);
}

/// Start once the host reports idle, or after `timeout` at the latest.
pub struct IdleStart {
    signal: Arc<dyn IdleSignal>,
    timeout: Duration,
}

impl IdleStart {
    pub fn new(signal: Arc<dyn IdleSignal>, timeout: Duration) -> Self {
        Self { signal, timeout }
    }
}

#[async_trait]
impl StartScheduler for IdleStart {
    async fn until_start(&self) {
        tokio::select! {
            _ = self.signal.idle() => {
                debug!("batch start: host idle");
            }
            _ = tokio::time::sleep(self.timeout) => {
                debug!("batch start: idle wait timed out after {:?}", self.timeout);
            }
        }
    }
}

/// Fallback when no idle capability exists: start on the next scheduler tick.
pub struct DeferredStart;

#[async_trait]
impl StartScheduler for DeferredStart {
    async fn until_start(&self) {
        tokio::task::yield_now().await;
        debug!("batch start: deferred tick");
    }
}

/// Pick the start scheduler for a batch. `None` means start immediately.
pub fn select_scheduler(
    config: &LoadConfig,
    idle: Option<Arc<dyn IdleSignal>>,
) -> Option<Box<dyn StartScheduler>> {
    if !config.load_on_idle {
        return None;
    }

    match idle {
        Some(signal) => Some(Box::new(IdleStart::new(signal, config.idle_timeout))),
        None => Some(Box::new(DeferredStart)),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[tokio::test]
    async fn test_idle_start_waits_for_signal() {
        let notifier = Arc::new(IdleNotifier::new());
        let scheduler = IdleStart::new(notifier.clone(), Duration::from_secs(10));

        let n = notifier.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            n.notify_idle();
        });

        let t0 = Instant::now();
        scheduler.until_start().await;
        let elapsed = t0.elapsed();
        assert!(elapsed >= Duration::from_millis(20));
        assert!(elapsed < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_idle_notification_before_wait_is_kept() {
        let notifier = Arc::new(IdleNotifier::new());
        notifier.notify_idle();

        let scheduler = IdleStart::new(notifier, Duration::from_secs(10));
        let t0 = Instant::now();
        scheduler.until_start().await;
        assert!(t0.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_idle_start_times_out() {
        let scheduler = IdleStart::new(Arc::new(IdleNotifier::new()), Duration::from_millis(30));
        let t0 = Instant::now();
        scheduler.until_start().await;
        assert!(t0.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_select_scheduler() {
        let mut config = LoadConfig::default();
        assert!(select_scheduler(&config, None).is_none());

        config.load_on_idle = true;
        assert!(select_scheduler(&config, None).is_some());
        assert!(select_scheduler(&config, Some(Arc::new(IdleNotifier::new()))).is_some());
    }
}
