use super::{Notifier, NotifyError};
use crate::config::TelegramConfig;
use crate::events::TransferNotification;
use async_trait::async_trait;
use std::time::Duration;
use txwatch_sdk::client::{ClientError, TelegramClient};
use txwatch_sdk::objects::SendMessageRequest;

/// Sends notifications to one Telegram chat through a bot.
pub struct TelegramNotifier {
    client: TelegramClient,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Result<Self, NotifyError> {
        let http = http_client(config.timeout)?;
        let client = TelegramClient::new(config.bot_token.clone())?.with_http_client(http);
        Ok(Self::with_client(client, config.chat_id.clone()))
    }

    pub fn with_client(client: TelegramClient, chat_id: impl Into<String>) -> Self {
        Self {
            client,
            chat_id: chat_id.into(),
        }
    }
}

/// HTTP client whose requests give up after `timeout`.
fn http_client(timeout: Duration) -> Result<reqwest::Client, NotifyError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(ClientError::from)?;
    Ok(client)
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, notification: &TransferNotification) -> Result<(), NotifyError> {
        let request = SendMessageRequest::html(self.chat_id.clone(), notification.render_html());
        self.client.send_message(&request).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}
