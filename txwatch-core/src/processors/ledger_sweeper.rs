//! LedgerSweeper processor.
//!
//! Periodically removes signatures older than the retention window from the
//! [`SignatureLedger`] so its memory stays bounded by the delivery rate.

use crate::entities::SignatureLedger;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// `tokio::time::interval` rejects a zero period.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

pub struct LedgerSweeper {
    ledger: SignatureLedger,
    interval: Duration,
    shutdown_rx: watch::Receiver<bool>,
}

impl LedgerSweeper {
    pub fn new(
        ledger: SignatureLedger,
        interval: Duration,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            ledger,
            interval: interval.max(MIN_SWEEP_INTERVAL),
            shutdown_rx,
        }
    }

    pub async fn run(mut self) {
        info!(
            retention_secs = self.ledger.retention().as_secs(),
            interval_secs = self.interval.as_secs(),
            "LedgerSweeper started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        info!("LedgerSweeper shutting down");
                        break;
                    }
                }

                _ = ticker.tick() => {
                    let removed = self.ledger.evict_expired();
                    if removed > 0 {
                        info!(removed, remaining = self.ledger.len(), "Evicted expired signatures");
                    } else {
                        debug!(remaining = self.ledger.len(), "No expired signatures");
                    }
                }
            }
        }
    }
}
