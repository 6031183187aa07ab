//! Domain records: monitored wallets, tracked tokens, transfers and the
//! processed-signature ledger.

pub mod processed_transaction;
pub mod tracked_tokens;
pub mod transfer;
pub mod wallet_group;

pub use processed_transaction::{ProcessedTransaction, SignatureLedger};
pub use tracked_tokens::TrackedTokens;
pub use transfer::TransferEvent;
pub use wallet_group::{DEFAULT_GROUP_SIZE, RegistryError, WalletGroup, WalletRegistry};
