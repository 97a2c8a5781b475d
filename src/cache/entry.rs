//! Cache Entry Module
//!
//! Defines the value held for each key in the recency index.

use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;

// == Cache Entry ==
/// An authoritative in-memory copy of one store entry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached payload
    pub value: Bytes,
    /// When the entry entered the index (Unix milliseconds)
    pub cached_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    pub fn new(value: Bytes) -> Self {
        Self {
            value,
            cached_at: current_timestamp_ms(),
        }
    }

    // == Age ==
    /// Milliseconds since the entry entered the index.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.cached_at)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
