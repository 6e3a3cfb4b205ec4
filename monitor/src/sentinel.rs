//! Modification tracking for the sentinel file.

use std::path::Path;
use std::time::UNIX_EPOCH;

use tracing::debug;

/// Outcome of a sentinel check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentinelCheck {
    /// Whether the sentinel changed since the prior watermark.
    pub changed: bool,

    /// Updated watermark; never lower than the prior one.
    pub watermark: i64,
}

/// Compare the sentinel's modification time against `prior_watermark`.
///
/// A missing or unreadable sentinel is not a change and leaves the watermark
/// untouched: deletion is invisible here, and a recreation with an
/// older-or-equal mtime goes unreported. The watermark advances only when the
/// modification time strictly exceeds it.
pub fn check(path: &Path, prior_watermark: i64) -> SentinelCheck {
    match modification_time(path) {
        Some(mtime) if mtime > prior_watermark => {
            debug!(
                "Sentinel {} changed (mtime {mtime} > watermark {prior_watermark})",
                path.display()
            );
            SentinelCheck {
                changed: true,
                watermark: mtime,
            }
        }
        _ => SentinelCheck {
            changed: false,
            watermark: prior_watermark,
        },
    }
}

/// Modification time of `path` in unix seconds, if available.
fn modification_time(path: &Path) -> Option<i64> {
    let modified = path.metadata().ok()?.modified().ok()?;
    let secs = modified.duration_since(UNIX_EPOCH).ok()?.as_secs();
    i64::try_from(secs).ok()
}
