//! # codewatch-monitor
//!
//! Poll-based change detection for a monitored directory tree. Each cycle
//! scans the tree, filters the listing to configured extensions, checks a
//! designated sentinel file for modification, diffs against the previous
//! baseline and dispatches an alert listing the newly observed paths.
//!
//! ## Features
//!
//! - **Deterministic Scanning**: sorted, complete listings before any diff
//! - **Sentinel Watching**: mtime watermark tracked outside the filter
//! - **Wholesale Baselines**: state replaced per cycle, never patched
//! - **Pluggable Collaborators**: store and notifier behind async traits
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        MonitorService                          │
//! ├────────────────────────────────────────────────────────────────┤
//! │  SettingsStore ──► ChangeDetector ──► ChangeReport ──► Notifier│
//! │        │                 │                                     │
//! │        ▼                 ▼                                     │
//! │    ScanState      scanner / sentinel                           │
//! └────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod detector;
pub mod dispatch;
pub mod error;
pub mod report;
pub mod scanner;
pub mod sentinel;
pub mod service;
pub mod state;
pub mod store;

pub use config::{MonitorConfig, matches_extension, normalize_directory, parse_extensions};
pub use detector::{ChangeDetector, CycleOutcome};
pub use dispatch::{AlertMessage, ChannelNotifier, LogNotifier, Notifier};
pub use error::{MonitorError, Result};
pub use report::{ChangeReport, CycleSummary};
pub use sentinel::SentinelCheck;
pub use service::{DEFAULT_SCAN_INTERVAL, MonitorService};
pub use state::ScanState;
pub use store::{JsonSettingsStore, SettingsStore};
