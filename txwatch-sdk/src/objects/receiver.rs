//! Response bodies of the txwatch receiver itself.

use serde::{Deserialize, Serialize};

/// Body returned by `POST /`.
///
/// Serializes as `{"status":"success"}` or
/// `{"status":"error","message":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ReceiverResponse {
    Success,
    Error { message: String },
}

impl ReceiverResponse {
    pub fn error(message: impl Into<String>) -> Self {
        ReceiverResponse::Error {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

/// Body returned by `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    /// Name of the wallet group served by this instance, e.g. `group1`.
    pub group: String,
}
