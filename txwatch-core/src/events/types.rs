//! Event type definitions.
//!
//! The receiver turns every qualifying transfer into a
//! [`TransferNotification`] and hands it to the notification queue; the
//! notification sender renders and delivers it.

use crate::entities::TransferEvent;
use crate::utils::display::{escape_html, format_amount, format_timestamp, short_address};
use compact_str::CompactString;
use time::OffsetDateTime;

/// Block explorer used for transaction links.
const EXPLORER_TX_URL: &str = "https://solscan.io/tx/";

const RULE_WIDTH: usize = 50;

/// A transfer that passed the token and wallet filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferNotification {
    /// Display symbol of the transferred token.
    pub symbol: CompactString,
    pub transfer: TransferEvent,
    /// When the receiver saw the delivery (not the on-chain block time).
    pub observed_at: OffsetDateTime,
}

impl TransferNotification {
    pub fn new(
        symbol: impl Into<CompactString>,
        transfer: TransferEvent,
        observed_at: OffsetDateTime,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            transfer,
            observed_at,
        }
    }

    /// Amount with fixed precision, e.g. `5.000000`.
    pub fn formatted_amount(&self) -> String {
        format_amount(self.transfer.amount)
    }

    /// Plain-text block written to the transfer log.
    pub fn render_plain(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        format!(
            "{rule}\n\
             NEW {symbol} INCOMING TRANSFER\n\
             Amount: {amount}\n\
             From: {from}\n\
             To: {to}\n\
             Transaction: {signature}\n\
             Timestamp: {timestamp}\n\
             {rule}",
            symbol = self.symbol,
            amount = self.formatted_amount(),
            from = self.transfer.from_address,
            to = self.transfer.to_address,
            signature = self.transfer.signature,
            timestamp = format_timestamp(self.observed_at),
        )
    }

    /// HTML message for the chat API.
    pub fn render_html(&self) -> String {
        format!(
            "🔔 <b>New {symbol} Incoming Transfer</b>\n\n\
             Amount: {amount}\n\
             From: <code>{from}</code>\n\
             To: <code>{to}</code>\n\
             Seen: {timestamp}\n\
             <a href=\"{EXPLORER_TX_URL}{signature}\">View Transaction</a>",
            symbol = escape_html(&self.symbol),
            amount = self.formatted_amount(),
            from = escape_html(&short_address(&self.transfer.from_address)),
            to = escape_html(&short_address(&self.transfer.to_address)),
            timestamp = format_timestamp(self.observed_at),
            signature = escape_html(&self.transfer.signature),
        )
    }
}
