//! Processors of the receiver pipeline.
//!
//! - `EventReceiver`: receives provider events, emits `TransferNotification`
//! - `NotificationSender`: receives `TransferNotification`, delivers it
//! - `LedgerSweeper`: evicts expired signatures from the ledger

pub mod event_receiver;
pub mod ledger_sweeper;
pub mod notification_sender;

pub use event_receiver::{EventError, EventOutcome, EventReceiver};
pub use ledger_sweeper::LedgerSweeper;
pub use notification_sender::NotificationSender;
