//! Directory enumeration for change detection.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{MonitorError, Result};

/// Enumerate files under `root`.
///
/// Non-recursive mode lists a single level; recursive mode walks the whole
/// subtree. Directories never appear in the result. The listing is complete
/// and sorted before it is returned, so diffing against a prior snapshot is
/// deterministic.
///
/// Any traversal failure aborts the scan: a partial listing must never be
/// diffed against the previous baseline.
pub fn scan(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(max_depth) {
        let entry = entry.map_err(|source| MonitorError::Scan {
            path: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!("Scanned {} files under {}", files.len(), root.display());
    Ok(files)
}
