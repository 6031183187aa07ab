//! Configuration types for txwatch.
//!
//! These types represent the validated runtime configuration used by the
//! server. The actual config loading/parsing is handled by the server crate.
//! Configuration is read once at startup; there is no hot reload.

mod ledger;
mod provider;
mod server;
mod telegram;

pub use ledger::LedgerConfig;
pub use provider::ProviderConfig;
pub use server::ServerConfig;
pub use telegram::TelegramConfig;
