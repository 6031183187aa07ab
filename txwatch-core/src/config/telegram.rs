//! Chat notification credentials.

use std::time::Duration;

/// Telegram bot used to deliver transfer notifications.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    /// Upper bound for one `sendMessage` call.
    pub timeout: Duration,
}
