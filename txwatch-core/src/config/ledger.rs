//! Processed-signature retention.

use std::time::Duration;

/// How long processed signatures are remembered.
///
/// Helius redelivers a failed webhook for a bounded period, so a signature
/// older than `retention` can safely be forgotten.
#[derive(Debug, Clone, Copy)]
pub struct LedgerConfig {
    pub retention: Duration,
    /// How often expired signatures are swept out.
    pub sweep_interval: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            retention: Duration::from_secs(24 * 60 * 60),
            sweep_interval: Duration::from_secs(60),
        }
    }
}
