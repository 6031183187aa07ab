//! Notification queue between the receiver and the notification sender.

use super::types::TransferNotification;
use tokio::sync::mpsc;

/// Default buffer size for the notification queue.
///
/// Large enough to absorb a burst of deliveries while the chat API is slow;
/// once full, further notifications are dropped instead of waited on.
pub const DEFAULT_CHANNEL_BUFFER: usize = 1024;

/// Sender handle for TransferNotification events.
pub type TransferNotificationSender = mpsc::Sender<TransferNotification>;
/// Receiver handle for TransferNotification events.
pub type TransferNotificationReceiver = mpsc::Receiver<TransferNotification>;

/// Create a new TransferNotification channel.
///
/// The receiver side must be owned by a single consumer so notifications are
/// delivered in the order they were queued.
pub fn transfer_notification_channel() -> (TransferNotificationSender, TransferNotificationReceiver)
{
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}
