//! Per-cycle outputs: the change report and the run summary.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Changes detected in one cycle.
///
/// Transient: produced once per cycle, handed to the dispatcher, then
/// discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeReport {
    /// Paths new in this cycle, in scan order. Includes the sentinel path
    /// when it changed and was not already part of the baseline.
    pub new_files: Vec<PathBuf>,

    /// Whether the sentinel's modification time advanced this cycle.
    pub sentinel_changed: bool,
}

impl ChangeReport {
    /// Whether there is anything to dispatch.
    ///
    /// Dispatch keys off `new_files` alone: a repeat sentinel change whose
    /// path is already in the baseline sets `sentinel_changed` but produces
    /// no alert.
    pub fn is_empty(&self) -> bool {
        self.new_files.is_empty()
    }

    /// Number of newly observed paths.
    pub fn len(&self) -> usize {
        self.new_files.len()
    }
}

/// Statistics for one cycle, for operator-facing logs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CycleSummary {
    /// Files enumerated by the scan.
    pub scanned: usize,

    /// Files retained by the extension filter.
    pub matched: usize,

    /// Newly observed paths.
    pub new_files: usize,

    /// Whether the sentinel changed.
    pub sentinel_changed: bool,

    /// Time taken in milliseconds.
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report() {
        let report = ChangeReport::default();
        assert!(report.is_empty());
        assert_eq!(report.len(), 0);
    }

    #[test]
    fn test_sentinel_flag_alone_does_not_fill_report() {
        let report = ChangeReport {
            new_files: Vec::new(),
            sentinel_changed: true,
        };
        assert!(report.is_empty());
    }

    #[test]
    fn test_report_with_paths() {
        let report = ChangeReport {
            new_files: vec![PathBuf::from("/site/b.php")],
            sentinel_changed: false,
        };
        assert!(!report.is_empty());
        assert_eq!(report.len(), 1);
    }
}
