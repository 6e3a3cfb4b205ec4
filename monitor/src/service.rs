//! The monitor service: drives cycles against a store and a notifier.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::detector::ChangeDetector;
use crate::dispatch::Notifier;
use crate::error::{MonitorError, Result};
use crate::report::CycleSummary;
use crate::store::SettingsStore;

/// Default interval between scheduled cycles.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(3600);

/// Drives detection cycles: load settings, run the detector, persist state,
/// dispatch alerts.
pub struct MonitorService<S, N> {
    /// Settings and state persistence.
    store: Arc<S>,

    /// Alert delivery.
    notifier: Arc<N>,

    /// Upper bound on a single cycle's scan, if any.
    scan_timeout: Option<Duration>,

    /// Serializes cycles: overlapping triggers must not race on the
    /// read-modify-replace of state.
    cycle_guard: Mutex<()>,

    /// Whether the scheduled loop is running.
    running: Arc<RwLock<bool>>,
}

impl<S, N> MonitorService<S, N>
where
    S: SettingsStore + 'static,
    N: Notifier + 'static,
{
    /// Create a service over a store and a notifier.
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self {
            store,
            notifier,
            scan_timeout: None,
            cycle_guard: Mutex::new(()),
            running: Arc::new(RwLock::new(false)),
        }
    }

    /// Bound each cycle's scan. A cycle that exceeds the bound fails without
    /// touching state; the abandoned scan task finishes in the background and
    /// its result is discarded.
    pub fn with_scan_timeout(mut self, bound: Duration) -> Self {
        self.scan_timeout = Some(bound);
        self
    }

    /// Run one complete cycle.
    ///
    /// State is persisted before the alert goes out, so notification is
    /// at-most-once: a failed dispatch is logged and never re-sent. Back-to-
    /// back and concurrent calls are safe; a cycle that fails leaves the
    /// prior state for the next trigger to retry against.
    pub async fn run_once(&self) -> Result<CycleSummary> {
        let _guard = self.cycle_guard.lock().await;

        let config = self.store.config().await?;
        let prior = self.store.state().await?;
        let recipient = config.recipient.clone();

        let detector = ChangeDetector::new(config);
        let cycle = task::spawn_blocking(move || detector.run_cycle(&prior));

        let outcome = match self.scan_timeout {
            Some(bound) => match timeout(bound, cycle).await {
                Ok(joined) => joined.map_err(|e| MonitorError::Cycle(e.to_string()))??,
                Err(_) => return Err(MonitorError::ScanTimeout(bound)),
            },
            None => cycle
                .await
                .map_err(|e| MonitorError::Cycle(e.to_string()))??,
        };

        self.store.replace_state(&outcome.state).await?;

        if !outcome.report.is_empty() {
            if let Err(e) = self.notifier.notify(&recipient, &outcome.report).await {
                warn!("Alert dispatch failed: {e}");
            }
        }

        Ok(outcome.summary)
    }

    /// Start the scheduled loop, one cycle per `interval`.
    ///
    /// The host trigger cadence is otherwise not the service's concern; this
    /// loop is just the built-in hourly-style driver. A failed cycle is
    /// logged and retried at the next tick.
    pub async fn start(self: Arc<Self>, interval: Duration) {
        if *self.running.read().await {
            return; // Already running
        }

        *self.running.write().await = true;

        let running = Arc::clone(&self.running);
        let service = self;

        tokio::spawn(async move {
            info!("Monitor loop started (interval {interval:?})");

            while *running.read().await {
                match service.run_once().await {
                    Ok(summary) => debug!(
                        "Cycle finished: {} new files in {} ms",
                        summary.new_files, summary.duration_ms
                    ),
                    Err(e) => warn!("Cycle failed, retrying next tick: {e}"),
                }

                tokio::time::sleep(interval).await;
            }

            info!("Monitor loop stopped");
        });
    }

    /// Stop the scheduled loop after the current sleep.
    pub async fn stop(&self) {
        *self.running.write().await = false;
    }

    /// Check if the scheduled loop is running.
    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    use crate::config::MonitorConfig;
    use crate::dispatch::ChannelNotifier;
    use crate::report::ChangeReport;
    use crate::store::JsonSettingsStore;

    async fn store_for(
        store_dir: &std::path::Path,
        config: &MonitorConfig,
    ) -> Arc<JsonSettingsStore> {
        let store = JsonSettingsStore::new(store_dir).await.unwrap();
        store.replace_config(config).await.unwrap();
        store.mark_activated().await.unwrap();
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_run_once_detects_and_alerts() {
        let watch_dir = TempDir::new().unwrap();
        let store_dir = TempDir::new().unwrap();
        File::create(watch_dir.path().join("a.php")).unwrap();

        let config = MonitorConfig::new(watch_dir.path()).with_recipient("ops@example.com");
        let store = store_for(store_dir.path(), &config).await;
        let (notifier, mut receiver) = ChannelNotifier::new(4);
        let service = MonitorService::new(store, Arc::new(notifier));

        let summary = service.run_once().await.unwrap();
        assert_eq!(summary.new_files, 1);

        let message = receiver.recv().await.unwrap();
        assert_eq!(message.recipient, "ops@example.com");
        assert!(message.body.contains("a.php"));

        // Nothing changed: the second cycle stays quiet.
        let summary = service.run_once().await.unwrap();
        assert_eq!(summary.new_files, 0);
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_new_file_between_cycles_is_reported() {
        let watch_dir = TempDir::new().unwrap();
        let store_dir = TempDir::new().unwrap();
        File::create(watch_dir.path().join("a.php")).unwrap();

        let config = MonitorConfig::new(watch_dir.path()).with_recipient("ops@example.com");
        let store = store_for(store_dir.path(), &config).await;
        let (notifier, mut receiver) = ChannelNotifier::new(4);
        let service = MonitorService::new(store, Arc::new(notifier));

        service.run_once().await.unwrap();
        receiver.recv().await.unwrap();

        File::create(watch_dir.path().join("b.php")).unwrap();
        let summary = service.run_once().await.unwrap();
        assert_eq!(summary.new_files, 1);

        let message = receiver.recv().await.unwrap();
        assert!(message.body.contains("b.php"));
        assert!(!message.body.contains("a.php"));
    }

    #[tokio::test]
    async fn test_dispatch_failure_does_not_roll_back_state() {
        struct FailingNotifier;

        #[async_trait::async_trait]
        impl Notifier for FailingNotifier {
            async fn notify(&self, _recipient: &str, _report: &ChangeReport) -> Result<()> {
                Err(MonitorError::ChannelSend)
            }
        }

        let watch_dir = TempDir::new().unwrap();
        let store_dir = TempDir::new().unwrap();
        File::create(watch_dir.path().join("a.php")).unwrap();

        let config = MonitorConfig::new(watch_dir.path()).with_recipient("ops@example.com");
        let store = store_for(store_dir.path(), &config).await;
        let service = MonitorService::new(store, Arc::new(FailingNotifier));

        // The cycle succeeds even though delivery failed...
        let summary = service.run_once().await.unwrap();
        assert_eq!(summary.new_files, 1);

        // ...and the baseline advanced: at-most-once, no duplicate alert.
        let summary = service.run_once().await.unwrap();
        assert_eq!(summary.new_files, 0);
    }

    #[tokio::test]
    async fn test_concurrent_triggers_report_exactly_once() {
        let watch_dir = TempDir::new().unwrap();
        let store_dir = TempDir::new().unwrap();
        File::create(watch_dir.path().join("a.php")).unwrap();

        let config = MonitorConfig::new(watch_dir.path()).with_recipient("ops@example.com");
        let store = store_for(store_dir.path(), &config).await;
        let (notifier, mut receiver) = ChannelNotifier::new(4);
        let service = Arc::new(MonitorService::new(store, Arc::new(notifier)));

        let (a, b) = tokio::join!(service.run_once(), service.run_once());
        let total = a.unwrap().new_files + b.unwrap().new_files;
        assert_eq!(total, 1);

        receiver.recv().await.unwrap();
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_generous_scan_timeout_passes_through() {
        let watch_dir = TempDir::new().unwrap();
        let store_dir = TempDir::new().unwrap();
        File::create(watch_dir.path().join("a.php")).unwrap();

        let config = MonitorConfig::new(watch_dir.path()).with_recipient("ops@example.com");
        let store = store_for(store_dir.path(), &config).await;
        let (notifier, _receiver) = ChannelNotifier::new(4);
        let service = MonitorService::new(store, Arc::new(notifier))
            .with_scan_timeout(Duration::from_secs(30));

        let summary = service.run_once().await.unwrap();
        assert_eq!(summary.new_files, 1);
    }

    #[tokio::test]
    async fn test_scheduled_loop_start_stop() {
        let watch_dir = TempDir::new().unwrap();
        let store_dir = TempDir::new().unwrap();

        let config = MonitorConfig::new(watch_dir.path()).with_recipient("ops@example.com");
        let store = store_for(store_dir.path(), &config).await;
        let (notifier, _receiver) = ChannelNotifier::new(4);
        let service = Arc::new(MonitorService::new(store, Arc::new(notifier)));

        assert!(!service.is_running().await);
        Arc::clone(&service).start(DEFAULT_SCAN_INTERVAL).await;
        assert!(service.is_running().await);

        service.stop().await;
        assert!(!service.is_running().await);
    }
}
