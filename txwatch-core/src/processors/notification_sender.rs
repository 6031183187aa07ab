//! NotificationSender processor.
//!
//! The NotificationSender is responsible for:
//! - Receiving `TransferNotification` from the queue
//! - Handing each notification to every configured [`Notifier`] in order
//! - Logging delivery failures (there is no retry)
//!
//! It is the single consumer of the queue, so notifications go out in the
//! order the receiver produced them.

use crate::events::{TransferNotification, TransferNotificationReceiver};
use crate::notifier::Notifier;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub struct NotificationSender {
    notification_rx: TransferNotificationReceiver,
    shutdown_rx: watch::Receiver<bool>,
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl NotificationSender {
    /// Create a new NotificationSender.
    ///
    /// # Arguments
    ///
    /// * `notification_rx` - Receiver for TransferNotification events
    /// * `shutdown_rx` - Receiver for shutdown signal
    /// * `notifiers` - Delivery targets, called in the given order
    pub fn new(
        notification_rx: TransferNotificationReceiver,
        shutdown_rx: watch::Receiver<bool>,
        notifiers: Vec<Arc<dyn Notifier>>,
    ) -> Self {
        Self {
            notification_rx,
            shutdown_rx,
            notifiers,
        }
    }

    /// Run until shutdown is signalled or every sender is dropped.
    ///
    /// Notifications already queued at shutdown are still delivered.
    pub async fn run(mut self) {
        info!(notifiers = self.notifiers.len(), "NotificationSender started");

        loop {
            tokio::select! {
                biased;

                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        info!("NotificationSender received shutdown signal");
                        break;
                    }
                }

                received = self.notification_rx.recv() => {
                    match received {
                        Some(notification) => {
                            self.deliver(&notification).await;
                        }
                        None => {
                            info!("Notification queue closed");
                            break;
                        }
                    }
                }
            }
        }

        self.notification_rx.close();
        while let Some(notification) = self.notification_rx.recv().await {
            self.deliver(&notification).await;
        }

        info!("NotificationSender shutdown complete");
    }

    /// Deliver one notification to every notifier. Returns how many
    /// deliveries succeeded.
    pub async fn deliver(&self, notification: &TransferNotification) -> usize {
        let mut delivered = 0;
        for notifier in &self.notifiers {
            match notifier.notify(notification).await {
                Ok(()) => {
                    delivered += 1;
                    debug!(
                        notifier = notifier.name(),
                        signature = %notification.transfer.signature,
                        "Notification delivered"
                    );
                }
                Err(e) => {
                    warn!(
                        notifier = notifier.name(),
                        signature = %notification.transfer.signature,
                        error = %e,
                        "Notification delivery failed"
                    );
                }
            }
        }
        delivered
    }
}
