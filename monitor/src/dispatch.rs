//! Alert composition and delivery contracts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::info;

use crate::error::{MonitorError, Result};
use crate::report::ChangeReport;

/// Subject line used for every alert.
pub const ALERT_SUBJECT: &str = "New files or sentinel changes detected";

/// A composed alert, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    /// Destination address.
    pub recipient: String,

    /// Fixed subject line.
    pub subject: String,

    /// Body listing each new path, one per line.
    pub body: String,

    /// When the alert was composed.
    pub created_at: DateTime<Utc>,
}

impl AlertMessage {
    /// Compose an alert for a non-empty report.
    pub fn from_report(recipient: impl Into<String>, report: &ChangeReport) -> Self {
        let paths: Vec<String> = report
            .new_files
            .iter()
            .map(|p| p.display().to_string())
            .collect();

        let body = format!(
            "New files were added or the watched configuration file was \
             modified in the directory:\n\n{}",
            paths.join("\n")
        );

        Self {
            recipient: recipient.into(),
            subject: ALERT_SUBJECT.to_string(),
            body,
            created_at: Utc::now(),
        }
    }
}

/// Collaborator contract for alert delivery.
///
/// Delivery failures are the transport's concern: state is persisted before
/// dispatch, so a failed delivery can never corrupt the baseline.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver an alert for `report` to `recipient`.
    async fn notify(&self, recipient: &str, report: &ChangeReport) -> Result<()>;
}

/// Notifier that writes alerts to the log instead of a transport.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, recipient: &str, report: &ChangeReport) -> Result<()> {
        let message = AlertMessage::from_report(recipient, report);
        info!(
            "Alert for {recipient}: {} ({} new paths)",
            message.subject,
            report.len()
        );
        Ok(())
    }
}

/// Notifier that forwards composed alerts into a channel.
pub struct ChannelNotifier {
    sender: mpsc::Sender<AlertMessage>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiving end of its channel.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<AlertMessage>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, recipient: &str, report: &ChangeReport) -> Result<()> {
        let message = AlertMessage::from_report(recipient, report);
        self.sender
            .send(message)
            .await
            .map_err(|_| MonitorError::ChannelSend)
    }
}
