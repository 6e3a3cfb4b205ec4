//! Cycle orchestration: scan, filter, sentinel check, diff, new state.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info};

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::report::{ChangeReport, CycleSummary};
use crate::scanner;
use crate::sentinel;
use crate::state::ScanState;

/// Everything a cycle produces.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    /// Changes to dispatch.
    pub report: ChangeReport,

    /// Replacement state snapshot to persist.
    pub state: ScanState,

    /// Run statistics.
    pub summary: CycleSummary,
}

/// Runs detection cycles against prior state snapshots.
///
/// The detector is a pure value-in/value-out component: it holds no mutable
/// state of its own, so running it is safe at any cadence as long as the
/// caller serializes the read-modify-replace of [`ScanState`].
pub struct ChangeDetector {
    config: MonitorConfig,
}

impl ChangeDetector {
    /// Create a detector for the given configuration.
    pub fn new(config: MonitorConfig) -> Self {
        Self { config }
    }

    /// The configuration this detector runs with.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Run one cycle: scan, filter, check the sentinel, diff against `prior`.
    ///
    /// A missing root is a quiescent cycle, not an error: the report is empty
    /// and the state comes back unchanged. A scan failure aborts the cycle
    /// without producing a replacement state, so the next trigger retries
    /// from the same baseline.
    pub fn run_cycle(&self, prior: &ScanState) -> Result<CycleOutcome> {
        let start = Instant::now();

        if !self.config.root.is_dir() {
            debug!(
                "Root {} missing, skipping cycle",
                self.config.root.display()
            );
            return Ok(CycleOutcome {
                report: ChangeReport::default(),
                state: prior.clone(),
                summary: CycleSummary::default(),
            });
        }

        let all_files = scanner::scan(&self.config.root, self.config.recursive)?;
        let scanned = all_files.len();

        let mut filtered: Vec<PathBuf> = all_files
            .into_iter()
            .filter(|path| self.config.matches(path))
            .collect();
        let matched = filtered.len();

        // The sentinel is evaluated independently of the extension filter and
        // appears in the filtered set exactly once when it changed.
        let mut watermark = prior.sentinel_watermark;
        let mut sentinel_changed = false;
        if self.config.watch_sentinel {
            let check = sentinel::check(&self.config.sentinel_path(), watermark);
            if check.changed {
                sentinel_changed = true;
                watermark = check.watermark;
                let sentinel_path = self.config.sentinel_path();
                if !filtered.contains(&sentinel_path) {
                    filtered.push(sentinel_path);
                }
            }
        }

        let known_files: BTreeSet<PathBuf> = filtered.iter().cloned().collect();
        let new_files: Vec<PathBuf> = filtered
            .into_iter()
            .filter(|path| !prior.is_known(path))
            .collect();

        let state = ScanState {
            known_files,
            sentinel_watermark: watermark,
            updated_at: Some(Utc::now()),
        };

        let summary = CycleSummary {
            scanned,
            matched,
            new_files: new_files.len(),
            sentinel_changed,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Cycle complete: {} scanned, {} matched, {} new (sentinel changed: {})",
            summary.scanned, summary.matched, summary.new_files, summary.sentinel_changed
        );

        Ok(CycleOutcome {
            report: ChangeReport {
                new_files,
                sentinel_changed,
            },
            state,
            summary,
        })
    }
}
