//! Helius webhook types.
//!
//! Two groups of shapes live here: the "enhanced transaction" events Helius
//! pushes to a receiver, and the request/response bodies of the
//! `/v0/webhooks` management API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pushed events
// ---------------------------------------------------------------------------

/// A webhook delivery body.
///
/// Helius batches events into a JSON array, but a single object is accepted
/// as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WebhookPayload {
    Batch(Vec<EventEntry>),
    Single(EventEntry),
}

impl WebhookPayload {
    /// Flatten the payload into its events, preserving delivery order.
    pub fn into_events(self) -> Vec<EventEntry> {
        match self {
            WebhookPayload::Batch(events) => events,
            WebhookPayload::Single(event) => vec![event],
        }
    }
}

/// One element of a delivery.
///
/// Anything that does not parse as an [`EnhancedTransaction`] is kept as raw
/// JSON so that one bad element never rejects the whole delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventEntry {
    Valid(EnhancedTransaction),
    Malformed(serde_json::Value),
}

/// An enhanced transaction event.
///
/// Only the fields the receiver reads are modelled; everything else in the
/// Helius payload is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedTransaction {
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub token_transfers: Option<Vec<TransferEntry>>,
}

impl EnhancedTransaction {
    /// Whether the event carries at least one token transfer entry.
    pub fn has_token_transfers(&self) -> bool {
        self.token_transfers
            .as_ref()
            .is_some_and(|transfers| !transfers.is_empty())
    }
}

/// One element of `tokenTransfers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransferEntry {
    Valid(TokenTransfer),
    Malformed(serde_json::Value),
}

/// A single SPL token movement inside an enhanced transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    #[serde(default)]
    pub mint: Option<String>,
    #[serde(default)]
    pub from_user_account: Option<String>,
    #[serde(default)]
    pub to_user_account: Option<String>,
    /// UI amount. Helius sends a JSON number; numeric strings are accepted too.
    #[serde(default)]
    pub token_amount: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Webhook management API
// ---------------------------------------------------------------------------

/// Transaction type filter of a webhook. Only transfers are registered;
/// every other Helius type deserializes to [`TransactionType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Transfer,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WebhookType {
    Enhanced,
    #[serde(other)]
    Other,
}

/// A webhook as returned by `GET /v0/webhooks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webhook {
    #[serde(rename = "webhookID")]
    pub webhook_id: String,
    #[serde(rename = "webhookURL")]
    pub webhook_url: String,
    #[serde(default, rename = "transactionTypes")]
    pub transaction_types: Vec<TransactionType>,
    #[serde(default, rename = "accountAddresses")]
    pub account_addresses: Vec<String>,
    #[serde(default, rename = "webhookType")]
    pub webhook_type: Option<WebhookType>,
}

/// Body of `POST /v0/webhooks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWebhookRequest {
    #[serde(rename = "webhookURL")]
    pub webhook_url: String,
    #[serde(rename = "transactionTypes")]
    pub transaction_types: Vec<TransactionType>,
    #[serde(rename = "accountAddresses")]
    pub account_addresses: Vec<String>,
    #[serde(rename = "webhookType")]
    pub webhook_type: WebhookType,
}

impl CreateWebhookRequest {
    /// An enhanced-transaction webhook that fires on transfers touching any
    /// of `accounts`.
    pub fn transfers(webhook_url: impl Into<String>, accounts: Vec<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            transaction_types: vec![TransactionType::Transfer],
            account_addresses: accounts,
            webhook_type: WebhookType::Enhanced,
        }
    }
}
