//! Processed transaction signatures.
//!
//! Providers retry webhook deliveries, so every signature is handled at most
//! once while it is retained. Entries expire after a fixed retention window
//! and are removed by [`SignatureLedger::evict_expired`].

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::{Duration, Instant};
use time::OffsetDateTime;

/// A signature that has been seen by this receiver.
#[derive(Debug, Clone, Copy)]
pub struct ProcessedTransaction {
    /// Wall-clock time of the first sighting.
    pub first_seen: OffsetDateTime,
    recorded_at: Instant,
}

/// Concurrent set of processed signatures with time-windowed retention.
///
/// Cloning is cheap; clones share the same underlying map.
#[derive(Debug, Clone)]
pub struct SignatureLedger {
    seen: Arc<DashMap<String, ProcessedTransaction>>,
    retention: Duration,
}

impl SignatureLedger {
    pub fn new(retention: Duration) -> Self {
        Self {
            seen: Arc::new(DashMap::new()),
            retention,
        }
    }

    /// Record `signature` as processed now.
    ///
    /// Returns `true` when the caller is the first to record it, `false` if
    /// it was already recorded within the retention window. Check and insert
    /// happen under one shard lock, so two racing deliveries of the same
    /// signature cannot both get `true`.
    pub fn record(&self, signature: &str) -> bool {
        self.record_at(signature, Instant::now())
    }

    pub fn record_at(&self, signature: &str, now: Instant) -> bool {
        let fresh = ProcessedTransaction {
            first_seen: OffsetDateTime::now_utc(),
            recorded_at: now,
        };
        match self.seen.entry(signature.to_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(fresh);
                true
            }
            Entry::Occupied(mut slot) => {
                if self.is_expired(slot.get(), now) {
                    slot.insert(fresh);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Whether `signature` is currently recorded (expired entries not yet
    /// swept still count).
    pub fn contains(&self, signature: &str) -> bool {
        self.seen.contains_key(signature)
    }

    pub fn get(&self, signature: &str) -> Option<ProcessedTransaction> {
        self.seen.get(signature).map(|entry| *entry)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Drop every entry older than the retention window. Returns how many
    /// entries were removed.
    pub fn evict_expired(&self) -> usize {
        self.evict_expired_at(Instant::now())
    }

    pub fn evict_expired_at(&self, now: Instant) -> usize {
        let before = self.seen.len();
        self.seen.retain(|_, entry| !self.is_expired(entry, now));
        before.saturating_sub(self.seen.len())
    }

    fn is_expired(&self, entry: &ProcessedTransaction, now: Instant) -> bool {
        now.saturating_duration_since(entry.recorded_at) >= self.retention
    }
}
