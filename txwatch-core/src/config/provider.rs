//! Blockchain-data provider credentials.

/// Helius API access, needed only for webhook provisioning.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
}
