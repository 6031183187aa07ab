//! Helius webhook management client.
//!
//! Every request authenticates with the `api-key` query parameter.

use reqwest::Client;
use url::Url;

use super::{ClientError, parse_response, redact};
use crate::objects::helius::{CreateWebhookRequest, Webhook};

/// Typed HTTP client for the Helius `/v0/webhooks` API.
#[derive(Debug, Clone)]
pub struct HeliusClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl HeliusClient {
    const DEFAULT_BASE_URL: &str = "https://api.helius.xyz/";

    /// Create a client against the public Helius endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self::with_base_url(
            Url::parse(Self::DEFAULT_BASE_URL)?,
            api_key,
        ))
    }

    /// Create a client against a custom endpoint (staging, mock server).
    pub fn with_base_url(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `GET /v0/webhooks` – list every webhook owned by the API key.
    pub async fn list_webhooks(&self) -> Result<Vec<Webhook>, ClientError> {
        let url = self.base_url.join("/v0/webhooks")?;

        let resp = self
            .http
            .get(url)
            .query(&[("api-key", self.api_key.as_str())])
            .send()
            .await
            .map_err(redact)?;

        parse_response(resp).await
    }

    /// `DELETE /v0/webhooks/{id}` – delete one webhook.
    pub async fn delete_webhook(&self, webhook_id: &str) -> Result<(), ClientError> {
        let url = self.base_url.join(&format!(
            "/v0/webhooks/{}",
            urlencoding::encode(webhook_id)
        ))?;

        let resp = self
            .http
            .delete(url)
            .query(&[("api-key", self.api_key.as_str())])
            .send()
            .await
            .map_err(redact)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api { status, body });
        }
        Ok(())
    }

    /// `POST /v0/webhooks` – create a webhook.
    pub async fn create_webhook(
        &self,
        request: &CreateWebhookRequest,
    ) -> Result<Webhook, ClientError> {
        let url = self.base_url.join("/v0/webhooks")?;

        let resp = self
            .http
            .post(url)
            .query(&[("api-key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(redact)?;

        parse_response(resp).await
    }
}
