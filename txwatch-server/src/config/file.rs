//! TOML file configuration structures.
//!
//! These structs directly map to the `txwatch-config.toml` file format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use txwatch_core::entities::DEFAULT_GROUP_SIZE;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    pub wallets: WalletsConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub log: LogConfig,
    /// Tracked tokens, mint address -> display symbol.
    ///
    /// TOML rejects duplicate keys, so one mint can never map to two symbols.
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8001").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8001))
}

/// Helius credentials. Only `provision` needs them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Overridden by `HELIUS_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Telegram bot section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Overridden by `TELEGRAM_TOKEN`.
    #[serde(default)]
    pub bot_token: Option<String>,
    /// Overridden by `TELEGRAM_ID`.
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default = "default_telegram_timeout")]
    pub timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            timeout_secs: default_telegram_timeout(),
        }
    }
}

fn default_telegram_timeout() -> u64 {
    10
}

/// Wallet registry source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletsConfig {
    /// CSV export with addresses in the first column. Relative paths are
    /// resolved against the config file's directory.
    pub csv: PathBuf,
    /// Addresses per group. Helius caps one webhook at 100k addresses.
    #[serde(default = "default_group_size")]
    pub group_size: usize,
}

fn default_group_size() -> usize {
    DEFAULT_GROUP_SIZE
}

/// Processed-signature ledger section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            retention_secs: default_retention_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_retention_secs() -> u64 {
    24 * 60 * 60
}

fn default_sweep_interval_secs() -> u64 {
    60
}

/// Transfer log section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Directory holding `token_transfers_group<N>.log`. Relative paths are
    /// resolved against the config file's directory.
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
        }
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"

[provider]
api_key = "helius-key"

[telegram]
bot_token = "123:abc"
chat_id = "-100200"
timeout_secs = 5

[wallets]
csv = "deposit_wallets.csv"
group_size = 2

[ledger]
retention_secs = 3600

[log]
dir = "logs"

[tokens]
"4k3Dyjzvzp8eMZWUXbBCjEvwSkkk59S5iCNLY3QrkX6R" = "RAY"
"EKpQGSJtjMFqKZ9KQanSqYXRcF8fBopzLHYxdM65zcjm" = "WIF"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.provider.api_key.as_deref(), Some("helius-key"));
        assert_eq!(config.telegram.timeout_secs, 5);
        assert_eq!(config.wallets.group_size, 2);
        assert_eq!(config.ledger.retention_secs, 3600);
        assert_eq!(config.ledger.sweep_interval_secs, 60);
        assert_eq!(config.log.dir, PathBuf::from("logs"));
        assert_eq!(
            config.tokens["4k3Dyjzvzp8eMZWUXbBCjEvwSkkk59S5iCNLY3QrkX6R"],
            "RAY"
        );
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
[wallets]
csv = "wallets.csv"
"#,
        )
        .unwrap();
        assert_eq!(config.server.listen, default_listen_addr());
        assert_eq!(config.wallets.group_size, DEFAULT_GROUP_SIZE);
        assert_eq!(config.telegram.timeout_secs, 10);
        assert!(config.telegram.bot_token.is_none());
        assert!(config.tokens.is_empty());
    }

    #[test]
    fn test_duplicate_mint_rejected() {
        let result: Result<FileConfig, _> = toml::from_str(
            r#"
[wallets]
csv = "wallets.csv"

[tokens]
"85VBFQZC9TZkfaptBWjvUw7YbZjy52A6mjtPGjstQAmQ" = "W"
"85VBFQZC9TZkfaptBWjvUw7YbZjy52A6mjtPGjstQAmQ" = "BOME"
"#,
        );
        assert!(result.is_err());
    }
}
