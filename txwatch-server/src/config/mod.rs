//! Configuration module for txwatch-server.
//!
//! Handles loading configuration from the TOML file, CLI arguments and
//! environment variables. Secrets in the environment (optionally loaded from
//! a `.env` file) take precedence over the file.

pub mod file;
pub mod runtime;

use crate::config::file::FileConfig;
use crate::config::runtime::{
    LedgerConfig, ProviderConfig, ServerConfig, TelegramConfig, TrackedTokens,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const ENV_HELIUS_API_KEY: &str = "HELIUS_API_KEY";
pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const ENV_TELEGRAM_CHAT_ID: &str = "TELEGRAM_ID";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("{0} is not configured")]
    Missing(&'static str),
}

/// Where the wallet registry comes from.
#[derive(Debug, Clone)]
pub struct WalletSource {
    pub csv: PathBuf,
    pub group_size: usize,
}

/// Loaded configuration result containing all parts.
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub provider: Option<ProviderConfig>,
    pub telegram: Option<TelegramConfig>,
    pub wallets: WalletSource,
    pub ledger: LedgerConfig,
    pub log_dir: PathBuf,
    pub tokens: TrackedTokens,
}

impl LoadedConfig {
    /// Telegram credentials, required by `serve`.
    pub fn require_telegram(&self) -> Result<&TelegramConfig, ConfigError> {
        self.telegram
            .as_ref()
            .ok_or(ConfigError::Missing("telegram bot_token/chat_id"))
    }

    /// Helius credentials, required by `provision`.
    pub fn require_provider(&self) -> Result<&ProviderConfig, ConfigError> {
        self.provider
            .as_ref()
            .ok_or(ConfigError::Missing("provider api_key"))
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    port_override: Option<u16>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, port_override: Option<u16>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            port_override,
        }
    }

    /// Load the configuration, reading overrides from the process environment.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Apply environment and CLI overrides
    /// 3. Validate the configuration
    /// 4. Build the loaded configuration
    pub fn load_with_env<F>(&self, lookup: F) -> Result<LoadedConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        let env = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(api_key) = env(ENV_HELIUS_API_KEY) {
            file_config.provider.api_key = Some(api_key);
        }
        if let Some(token) = env(ENV_TELEGRAM_TOKEN) {
            file_config.telegram.bot_token = Some(token);
        }
        if let Some(chat_id) = env(ENV_TELEGRAM_CHAT_ID) {
            file_config.telegram.chat_id = Some(chat_id);
        }
        if let Some(port) = self.port_override {
            file_config.server.listen.set_port(port);
        }

        validate(&file_config)?;
        Ok(self.build_loaded_config(file_config))
    }

    fn build_loaded_config(&self, file_config: FileConfig) -> LoadedConfig {
        let base_dir = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let telegram = match (file_config.telegram.bot_token, file_config.telegram.chat_id) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig {
                bot_token,
                chat_id,
                timeout: Duration::from_secs(file_config.telegram.timeout_secs),
            }),
            _ => None,
        };

        LoadedConfig {
            server: ServerConfig {
                listen: file_config.server.listen,
            },
            provider: file_config
                .provider
                .api_key
                .map(|api_key| ProviderConfig { api_key }),
            telegram,
            wallets: WalletSource {
                csv: base_dir.join(file_config.wallets.csv),
                group_size: file_config.wallets.group_size,
            },
            ledger: LedgerConfig {
                retention: Duration::from_secs(file_config.ledger.retention_secs),
                sweep_interval: Duration::from_secs(file_config.ledger.sweep_interval_secs),
            },
            log_dir: base_dir.join(file_config.log.dir),
            tokens: file_config.tokens.into_iter().collect(),
        }
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    if config.wallets.group_size == 0 {
        return Err(ConfigError::ValidationError(
            "wallets.group_size must be greater than zero".into(),
        ));
    }
    if config.tokens.is_empty() {
        return Err(ConfigError::ValidationError(
            "at least one token must be listed under [tokens]".into(),
        ));
    }
    for (mint, symbol) in &config.tokens {
        if mint.trim().is_empty() || symbol.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "token entry {mint:?} = {symbol:?} has an empty mint or symbol"
            )));
        }
    }
    if config.telegram.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "telegram.timeout_secs must be greater than zero".into(),
        ));
    }
    if config.ledger.retention_secs == 0 || config.ledger.sweep_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "ledger retention and sweep interval must be greater than zero".into(),
        ));
    }
    Ok(())
}
