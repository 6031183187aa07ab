//! EventReceiver processor.
//!
//! The EventReceiver is responsible for:
//! - Receiving one provider event at a time via the `Processor` trait
//! - Ignoring events without token transfers
//! - Suppressing redelivered events through the [`SignatureLedger`]
//! - Keeping only transfers of tracked tokens into this instance's wallet group
//! - Emitting a `TransferNotification` per qualifying transfer
//!
//! One receiver serves exactly one wallet group. Notifications are queued,
//! not delivered inline, so a slow chat API never holds up the HTTP response.

use crate::entities::{SignatureLedger, TrackedTokens, TransferEvent, WalletGroup};
use crate::events::{TransferNotification, TransferNotificationSender};
use kanau::processor::Processor;
use std::sync::Arc;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, info, warn};
use txwatch_sdk::objects::{EventEntry, TokenTransfer, TransferEntry};

/// Longest raw JSON excerpt quoted in error messages and logs.
const RAW_EXCERPT_LEN: usize = 120;

/// What happened to an event that was processed without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event carried no token transfers.
    NoTransfers,
    /// The signature was already processed.
    Duplicate,
    /// The event was recorded; `notifications` transfers were queued.
    Processed { notifications: usize },
}

/// Errors that abort processing of a single event.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("event has token transfers but no transaction signature")]
    MissingSignature,

    #[error("malformed event: {0}")]
    Malformed(String),
}

/// Filters provider events for one wallet group.
pub struct EventReceiver {
    wallets: Arc<WalletGroup>,
    tokens: Arc<TrackedTokens>,
    ledger: SignatureLedger,
    notification_tx: TransferNotificationSender,
}

impl EventReceiver {
    pub fn new(
        wallets: Arc<WalletGroup>,
        tokens: Arc<TrackedTokens>,
        ledger: SignatureLedger,
        notification_tx: TransferNotificationSender,
    ) -> Self {
        Self {
            wallets,
            tokens,
            ledger,
            notification_tx,
        }
    }

    pub fn wallets(&self) -> &WalletGroup {
        &self.wallets
    }

    pub fn tokens(&self) -> &TrackedTokens {
        &self.tokens
    }

    pub fn ledger(&self) -> &SignatureLedger {
        &self.ledger
    }

    /// Turn a transfer into a notification if it moves a tracked token into
    /// one of our wallets.
    fn qualify(
        &self,
        transfer: TokenTransfer,
        signature: &str,
        observed_at: OffsetDateTime,
    ) -> Option<TransferNotification> {
        let mint = transfer.mint?;
        let symbol = self.tokens.symbol(&mint)?;
        let to_address = transfer
            .to_user_account
            .filter(|to| self.wallets.contains(to))?;

        let Some(from_address) = transfer.from_user_account else {
            warn!(
                group = self.wallets.name(),
                signature,
                mint = %mint,
                "Incoming transfer has no source account, skipping"
            );
            return None;
        };

        Some(TransferNotification::new(
            symbol,
            TransferEvent {
                mint,
                from_address,
                to_address,
                amount: transfer.token_amount.unwrap_or_default(),
                signature: signature.to_owned(),
            },
            observed_at,
        ))
    }

    /// Queue a notification without waiting. Returns `false` if the queue is
    /// full or closed; the notification is then logged and dropped, never
    /// propagated, so a stalled chat API cannot hold up the HTTP handler.
    fn dispatch(&self, notification: TransferNotification) -> bool {
        info!(
            group = self.wallets.name(),
            symbol = %notification.symbol,
            amount = %notification.formatted_amount(),
            from = %notification.transfer.from_address,
            to = %notification.transfer.to_address,
            signature = %notification.transfer.signature,
            "Incoming transfer"
        );

        match self.notification_tx.try_send(notification) {
            Ok(()) => true,
            Err(TrySendError::Full(dropped)) => {
                error!(
                    group = self.wallets.name(),
                    signature = %dropped.transfer.signature,
                    symbol = %dropped.symbol,
                    "Notification queue full, dropping notification"
                );
                false
            }
            Err(TrySendError::Closed(dropped)) => {
                error!(
                    group = self.wallets.name(),
                    signature = %dropped.transfer.signature,
                    "Notification queue closed, dropping notification"
                );
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Processor trait implementation
// ---------------------------------------------------------------------------

impl Processor<EventEntry> for EventReceiver {
    type Output = EventOutcome;
    type Error = EventError;

    async fn process(&self, entry: EventEntry) -> Result<EventOutcome, EventError> {
        let event = match entry {
            EventEntry::Valid(event) => event,
            EventEntry::Malformed(raw) => {
                return Err(EventError::Malformed(format!(
                    "expected a transaction object, got {}",
                    excerpt(&raw)
                )));
            }
        };

        if !event.has_token_transfers() {
            return Ok(EventOutcome::NoTransfers);
        }

        let Some(signature) = event.signature.filter(|s| !s.is_empty()) else {
            return Err(EventError::MissingSignature);
        };

        // Recorded before any transfer is looked at, so a concurrent
        // redelivery of the same event is already suppressed.
        if !self.ledger.record(&signature) {
            debug!(
                group = self.wallets.name(),
                signature = %signature,
                first_seen = ?self.ledger.get(&signature).map(|seen| seen.first_seen),
                "Duplicate delivery, skipping"
            );
            return Ok(EventOutcome::Duplicate);
        }

        let observed_at = OffsetDateTime::now_utc();
        let mut notifications = 0;

        for (position, entry) in event
            .token_transfers
            .unwrap_or_default()
            .into_iter()
            .enumerate()
        {
            let transfer = match entry {
                TransferEntry::Valid(transfer) => transfer,
                TransferEntry::Malformed(raw) => {
                    warn!(
                        group = self.wallets.name(),
                        signature = %signature,
                        position,
                        raw = %excerpt(&raw),
                        "Malformed token transfer, skipping"
                    );
                    continue;
                }
            };

            let Some(notification) = self.qualify(transfer, &signature, observed_at) else {
                continue;
            };

            if self.dispatch(notification) {
                notifications += 1;
            }
        }

        Ok(EventOutcome::Processed { notifications })
    }
}

fn excerpt(raw: &serde_json::Value) -> String {
    let text = raw.to_string();
    match text.char_indices().nth(RAW_EXCERPT_LEN) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{
        DEFAULT_CHANNEL_BUFFER, TransferNotificationReceiver, transfer_notification_channel,
    };
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::time::Duration;
    use txwatch_sdk::objects::WebhookPayload;

    fn receiver() -> (EventReceiver, TransferNotificationReceiver) {
        let wallets = WalletGroup::new(1, vec!["W1".to_string(), "W3".to_string()]);
        let tokens: TrackedTokens = [("RAY_MINT", "RAY"), ("JUP_MINT", "JUP")]
            .into_iter()
            .collect();
        let (tx, rx) = transfer_notification_channel();
        let receiver = EventReceiver::new(
            Arc::new(wallets),
            Arc::new(tokens),
            SignatureLedger::new(Duration::from_secs(3600)),
            tx,
        );
        (receiver, rx)
    }

    fn entries(json: &str) -> Vec<EventEntry> {
        serde_json::from_str::<WebhookPayload>(json)
            .unwrap()
            .into_events()
    }

    fn drain(rx: &mut TransferNotificationReceiver) -> Vec<TransferNotification> {
        let mut out = Vec::new();
        while let Ok(n) = rx.try_recv() {
            out.push(n);
        }
        out
    }

    const SCENARIO: &str = r#"{
        "signature": "S1",
        "tokenTransfers": [
            {"mint": "RAY_MINT", "toUserAccount": "W1", "fromUserAccount": "W2", "tokenAmount": "5.0"}
        ]
    }"#;

    #[tokio::test]
    async fn test_scenario_single_notification() {
        let (receiver, mut rx) = receiver();
        let outcome = receiver
            .process(entries(SCENARIO).remove(0))
            .await
            .unwrap();
        assert_eq!(outcome, EventOutcome::Processed { notifications: 1 });

        let sent = drain(&mut rx);
        assert_eq!(sent.len(), 1);
        let n = &sent[0];
        assert_eq!(n.symbol, "RAY");
        assert_eq!(n.formatted_amount(), "5.000000");
        assert_eq!(n.transfer.amount, Decimal::from_str("5.0").unwrap());
        assert_eq!(n.transfer.from_address, "W2");
        assert_eq!(n.transfer.to_address, "W1");
        assert_eq!(n.transfer.signature, "S1");
    }

    #[tokio::test]
    async fn test_redelivery_notifies_once() {
        let (receiver, mut rx) = receiver();
        let first = receiver.process(entries(SCENARIO).remove(0)).await.unwrap();
        let second = receiver.process(entries(SCENARIO).remove(0)).await.unwrap();

        assert_eq!(first, EventOutcome::Processed { notifications: 1 });
        assert_eq!(second, EventOutcome::Duplicate);
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[tokio::test]
    async fn test_no_transfer_list_is_ignored() {
        let (receiver, mut rx) = receiver();
        for json in [
            r#"{"signature": "S1"}"#,
            r#"{"signature": "S2", "tokenTransfers": null}"#,
            r#"{"signature": "S3", "tokenTransfers": []}"#,
            r#"{"tokenTransfers": []}"#,
        ] {
            let outcome = receiver.process(entries(json).remove(0)).await.unwrap();
            assert_eq!(outcome, EventOutcome::NoTransfers);
        }
        assert!(drain(&mut rx).is_empty());
        assert!(receiver.ledger().is_empty());
    }

    #[tokio::test]
    async fn test_untracked_token_and_foreign_wallet_are_skipped() {
        let (receiver, mut rx) = receiver();
        let json = r#"{
            "signature": "S1",
            "tokenTransfers": [
                {"mint": "OTHER_MINT", "toUserAccount": "W1", "fromUserAccount": "W2", "tokenAmount": 1},
                {"mint": "RAY_MINT", "toUserAccount": "NOT_OURS", "fromUserAccount": "W2", "tokenAmount": 1},
                {"mint": "RAY_MINT", "fromUserAccount": "W2", "tokenAmount": 1},
                {"toUserAccount": "W1", "fromUserAccount": "W2", "tokenAmount": 1}
            ]
        }"#;
        let outcome = receiver.process(entries(json).remove(0)).await.unwrap();
        assert_eq!(outcome, EventOutcome::Processed { notifications: 0 });
        assert!(drain(&mut rx).is_empty());
        assert!(receiver.ledger().contains("S1"));
    }

    #[tokio::test]
    async fn test_transfer_order_is_preserved() {
        let (receiver, mut rx) = receiver();
        let json = r#"{
            "signature": "S1",
            "tokenTransfers": [
                {"mint": "JUP_MINT", "toUserAccount": "W3", "fromUserAccount": "A", "tokenAmount": 2},
                "not an object",
                {"mint": "RAY_MINT", "toUserAccount": "W1", "fromUserAccount": "B", "tokenAmount": 3}
            ]
        }"#;
        let outcome = receiver.process(entries(json).remove(0)).await.unwrap();
        assert_eq!(outcome, EventOutcome::Processed { notifications: 2 });

        let symbols: Vec<_> = drain(&mut rx).into_iter().map(|n| n.symbol).collect();
        assert_eq!(symbols, ["JUP", "RAY"]);
    }

    #[tokio::test]
    async fn test_malformed_event_does_not_affect_siblings() {
        let (receiver, mut rx) = receiver();
        let batch = entries(&format!(r#"[42, {{"signature": 7}}, {SCENARIO}]"#));
        assert_eq!(batch.len(), 3);

        let mut results = Vec::new();
        for entry in batch {
            results.push(receiver.process(entry).await);
        }
        assert!(matches!(results[0], Err(EventError::Malformed(_))));
        assert!(matches!(results[1], Err(EventError::Malformed(_))));
        assert!(matches!(
            results[2],
            Ok(EventOutcome::Processed { notifications: 1 })
        ));
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[tokio::test]
    async fn test_missing_signature_is_an_error() {
        let (receiver, mut rx) = receiver();
        let json = r#"{"tokenTransfers": [
            {"mint": "RAY_MINT", "toUserAccount": "W1", "fromUserAccount": "W2", "tokenAmount": 1}
        ]}"#;
        let result = receiver.process(entries(json).remove(0)).await;
        assert!(matches!(result, Err(EventError::MissingSignature)));
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_missing_source_skips_only_that_transfer() {
        let (receiver, mut rx) = receiver();
        let json = r#"{
            "signature": "S1",
            "tokenTransfers": [
                {"mint": "RAY_MINT", "toUserAccount": "W1", "tokenAmount": 1},
                {"mint": "RAY_MINT", "toUserAccount": "W1", "fromUserAccount": "W2"}
            ]
        }"#;
        let outcome = receiver.process(entries(json).remove(0)).await.unwrap();
        assert_eq!(outcome, EventOutcome::Processed { notifications: 1 });

        let sent = drain(&mut rx);
        assert_eq!(sent[0].formatted_amount(), "0.000000");
    }

    #[tokio::test]
    async fn test_full_queue_drops_without_waiting() {
        let (receiver, mut rx) = receiver();
        let backlog = entries(SCENARIO).remove(0);
        for i in 0..DEFAULT_CHANNEL_BUFFER {
            let mut entry = backlog.clone();
            if let EventEntry::Valid(event) = &mut entry {
                event.signature = Some(format!("BACKLOG{i}"));
            }
            receiver.process(entry).await.unwrap();
        }

        let json = SCENARIO.replace("\"S1\"", "\"S_NEW\"");
        let outcome = tokio::time::timeout(
            Duration::from_secs(1),
            receiver.process(entries(&json).remove(0)),
        )
        .await
        .expect("processing must not wait for queue space")
        .unwrap();
        assert_eq!(outcome, EventOutcome::Processed { notifications: 0 });
        assert!(receiver.ledger().contains("S_NEW"));
        assert_eq!(drain(&mut rx).len(), DEFAULT_CHANNEL_BUFFER);
    }

    #[tokio::test]
    async fn test_closed_queue_is_not_an_error() {
        let (receiver, rx) = receiver();
        drop(rx);
        let outcome = receiver
            .process(entries(SCENARIO).remove(0))
            .await
            .unwrap();
        assert_eq!(outcome, EventOutcome::Processed { notifications: 0 });
    }
}
