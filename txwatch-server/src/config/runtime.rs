//! Runtime configuration re-exports.
//!
//! The validated config types are defined in `txwatch-core::config`.
//! This module re-exports them for convenience.

pub use txwatch_core::config::{LedgerConfig, ProviderConfig, ServerConfig, TelegramConfig};
pub use txwatch_core::entities::TrackedTokens;
