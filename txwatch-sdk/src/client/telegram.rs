//! Telegram Bot API client, limited to `sendMessage`.

use reqwest::Client;
use url::Url;

use super::{ClientError, parse_response, redact};
use crate::objects::telegram::{SendMessageRequest, TelegramResponse};

#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: Client,
    base_url: Url,
    bot_token: String,
}

impl TelegramClient {
    const DEFAULT_BASE_URL: &str = "https://api.telegram.org/";

    pub fn new(bot_token: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self::with_base_url(
            Url::parse(Self::DEFAULT_BASE_URL)?,
            bot_token,
        ))
    }

    pub fn with_base_url(base_url: Url, bot_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            bot_token: bot_token.into(),
        }
    }

    /// Replace the default `reqwest::Client`, e.g. to set a request timeout.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /bot{token}/sendMessage`.
    ///
    /// A 2xx answer with `"ok": false` is reported as
    /// [`ClientError::Rejected`].
    pub async fn send_message(&self, request: &SendMessageRequest) -> Result<(), ClientError> {
        let url = self
            .base_url
            .join(&format!("/bot{}/sendMessage", self.bot_token))?;

        let resp = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(redact)?;

        let body: TelegramResponse<serde_json::Value> = parse_response(resp).await?;
        if body.ok {
            Ok(())
        } else {
            Err(ClientError::Rejected(
                body.description
                    .unwrap_or_else(|| "telegram returned ok=false".to_string()),
            ))
        }
    }
}
