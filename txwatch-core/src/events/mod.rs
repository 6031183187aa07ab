//! Events flowing from the receiver to the notifier.
//!
//! # Event Flow
//!
//! 1. `POST /` -> `EventReceiver` filters and deduplicates
//! 2. `EventReceiver` emits `TransferNotification` -> `NotificationSender`
//! 3. `NotificationSender` appends to the transfer log and calls the `Notifier`

pub mod channels;
pub mod types;

pub use channels::{
    DEFAULT_CHANNEL_BUFFER, TransferNotificationReceiver, TransferNotificationSender,
    transfer_notification_channel,
};
pub use types::TransferNotification;
