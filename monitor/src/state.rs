//! Persisted scan state.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of what the monitor knew at the end of the last successful cycle.
///
/// Replaced wholesale at the end of every cycle, never mutated incrementally;
/// a failed cycle leaves the previous snapshot untouched. Files that fall out
/// of the filtered listing are forgotten and will be re-reported as new if
/// they reappear: the baseline tracks currently known matching files, not a
/// permanent ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanState {
    /// Files matching the filter as of the last successful cycle.
    pub known_files: BTreeSet<PathBuf>,

    /// Last observed sentinel modification time in unix seconds, 0 if never.
    pub sentinel_watermark: i64,

    /// When this snapshot was taken.
    pub updated_at: Option<DateTime<Utc>>,
}

impl ScanState {
    /// The state seeded on first activation: nothing known, watermark 0.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether `path` was part of the previous baseline.
    pub fn is_known(&self, path: &Path) -> bool {
        self.known_files.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state() {
        let state = ScanState::empty();
        assert!(state.known_files.is_empty());
        assert_eq!(state.sentinel_watermark, 0);
        assert!(state.updated_at.is_none());
    }

    #[test]
    fn test_is_known() {
        let mut state = ScanState::empty();
        state.known_files.insert(PathBuf::from("/site/a.php"));

        assert!(state.is_known(Path::new("/site/a.php")));
        assert!(!state.is_known(Path::new("/site/b.php")));
    }
}
