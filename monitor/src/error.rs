//! Error types for the change monitor.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Errors that can occur while running the monitor.
///
/// Every failure is local to a single cycle; the next trigger retries against
/// the unchanged prior state.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Directory traversal failed.
    #[error("scan failed under {}: {source}", .path.display())]
    Scan {
        /// Root that was being scanned.
        path: PathBuf,

        /// Underlying traversal error.
        #[source]
        source: walkdir::Error,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Settings store failure.
    #[error("store error: {0}")]
    Store(String),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A cycle's scan exceeded its bound.
    #[error("scan timed out after {0:?}")]
    ScanTimeout(Duration),

    /// The cycle task did not run to completion.
    #[error("cycle failed: {0}")]
    Cycle(String),

    /// Channel send error.
    #[error("channel error: failed to send alert")]
    ChannelSend,
}
