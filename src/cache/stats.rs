//! Cache Statistics Module
//!
//! Counters for the bounded cache, recorded under the cache lock and
//! reported through `/stats`.

use serde::Serialize;

/// Something the bounded cache counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEvent {
    /// Read answered from the index
    Hit,
    /// Read that missed the index
    Miss,
    /// Miss repopulated from the backing store
    StoreRead,
    /// Entry pushed out of the index by capacity
    Eviction,
}

// == Cache Stats ==
/// Snapshot of bounded cache counters and sizes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub store_reads: u64,
    pub evictions: u64,
    /// Entries currently held in the index
    pub entries: usize,
    /// Configured capacity (non-positive means pass-through)
    pub capacity: i64,
    /// Live entries reported by the backing store
    pub stored_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: CacheEvent) {
        let counter = match event {
            CacheEvent::Hit => &mut self.hits,
            CacheEvent::Miss => &mut self.misses,
            CacheEvent::StoreRead => &mut self.store_reads,
            CacheEvent::Eviction => &mut self.evictions,
        };
        *counter += 1;
    }

    /// Total reads seen, hits plus misses.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of reads served from the index, 0.0 before any read.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }

    /// Copies the counters and fills in the current sizes.
    pub fn snapshot(&self, entries: usize, capacity: i64, stored_entries: usize) -> Self {
        Self {
            entries,
            capacity,
            stored_entries,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_routes_to_counter() {
        let mut stats = CacheStats::new();
        stats.record(CacheEvent::Eviction);
        stats.record(CacheEvent::Eviction);
        stats.record(CacheEvent::StoreRead);
        stats.record(CacheEvent::Miss);

        assert_eq!(stats.evictions, 2);
        assert_eq!(stats.store_reads, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
    }

    #[test]
    fn test_hit_rate() {
        let mut stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);

        for _ in 0..3 {
            stats.record(CacheEvent::Hit);
        }
        stats.record(CacheEvent::Miss);

        assert_eq!(stats.lookups(), 4);
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_snapshot_keeps_counters() {
        let mut stats = CacheStats::new();
        stats.record(CacheEvent::Hit);

        let snap = stats.snapshot(2, 5, 7);
        assert_eq!(snap.hits, 1);
        assert_eq!((snap.entries, snap.capacity, snap.stored_entries), (2, 5, 7));
    }
}
