//! Application state shared across all request handlers.

use kanau::processor::Processor;
use std::sync::Arc;
use txwatch_core::processors::{EventError, EventOutcome, EventReceiver};
use txwatch_sdk::objects::EventEntry;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
/// Each instance owns its own ledger and wallet group, so independent
/// receivers can coexist in one process.
#[derive(Clone)]
pub struct AppState {
    pub receiver: Arc<EventReceiver>,
}

impl AppState {
    pub fn new(receiver: EventReceiver) -> Self {
        Self {
            receiver: Arc::new(receiver),
        }
    }

    /// Name of the wallet group this instance serves.
    pub fn group_name(&self) -> &str {
        self.receiver.wallets().name()
    }

    /// Run one provider event through the receiver.
    pub async fn process_event(&self, entry: EventEntry) -> Result<EventOutcome, EventError> {
        self.receiver.process(entry).await
    }
}
