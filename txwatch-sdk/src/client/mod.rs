//! HTTP clients for the provider webhook API and the chat API.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod helius;
mod telegram;

pub use helius::HeliusClient;
pub use telegram::TelegramClient;

use reqwest::StatusCode;

/// Errors produced by the SDK HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, timeout, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// The server answered 2xx but refused the request in its body.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await.map_err(redact)?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}

/// Strip the request URL from transport errors; both APIs carry their
/// credential in the URL.
fn redact(err: reqwest::Error) -> ClientError {
    ClientError::Http(err.without_url())
}
