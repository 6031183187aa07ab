//! Notification delivery.
//!
//! A [`Notifier`] pushes one rendered notification to an external channel.
//! Delivery is best effort: the caller logs failures and moves on.

mod telegram;
mod transfer_log;

pub use telegram::TelegramNotifier;
pub use transfer_log::TransferLog;

use crate::events::TransferNotification;
use async_trait::async_trait;
use thiserror::Error;
use txwatch_sdk::client::ClientError;

/// Errors that can occur during notification delivery.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Chat API request failed or was rejected.
    #[error("chat api error: {0}")]
    Client(#[from] ClientError),

    /// Writing the transfer log failed.
    #[error("transfer log error: {0}")]
    Io(#[from] std::io::Error),
}

/// Delivers notifications to an external channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &TransferNotification) -> Result<(), NotifyError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}
