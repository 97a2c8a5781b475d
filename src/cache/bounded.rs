//! Bounded Cache Module
//!
//! Capacity-bounded LRU index layered over a backing store. Reads go
//! through to the store on a miss, writes go through to the store before
//! the index changes, and eviction deletes from both.

use std::io::Read;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheEvent, CacheStats, RecencyIndex};
use crate::storage::{Context, Result, Storage, StorageError};

// == Cache State ==
/// Everything guarded by the cache lock.
#[derive(Debug)]
struct CacheState {
    capacity: i64,
    index: RecencyIndex<CacheEntry>,
    stats: CacheStats,
}

// == Bounded Cache ==
/// LRU cache over a shared [`Storage`].
///
/// One mutex covers the index and the delegated store calls for the whole
/// of each operation, so no thread observes a half-evicted entry.
///
/// A capacity of zero or less turns the index into a pass-through: entries
/// are dropped from it immediately and stay in the store.
pub struct BoundedCache {
    storage: Arc<dyn Storage>,
    state: Mutex<CacheState>,
}

impl BoundedCache {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries in memory.
    pub fn new(capacity: i64, storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            state: Mutex::new(CacheState {
                capacity,
                index: RecencyIndex::new(),
                stats: CacheStats::new(),
            }),
        }
    }

    // == Get ==
    /// Returns the bytes for `key`.
    ///
    /// An index hit never touches the store. A miss reads through to the
    /// store and caches the result, which may evict the oldest entry. A
    /// store not-found is returned unchanged.
    pub fn get(&self, ctx: &Context, key: &str) -> Result<Bytes> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        if let Some(value) = state.index.touch(key).map(|entry| entry.value.clone()) {
            state.stats.record(CacheEvent::Hit);
            debug!(key, "Cache hit");
            return Ok(value);
        }
        state.stats.record(CacheEvent::Miss);

        let mut reader = self.storage.get(ctx, key)?;
        let mut buf = Vec::new();
        reader
            .read_to_end(&mut buf)
            .map_err(|e| StorageError::io("failed to read blob", e))?;
        let value = Bytes::from(buf);

        state.stats.record(CacheEvent::StoreRead);
        debug!(key, size = value.len(), "Cache repopulated from storage");

        state
            .index
            .insert(key.to_string(), CacheEntry::new(value.clone()));
        self.evict_overflow(ctx, state)?;

        Ok(value)
    }

    // == Set ==
    /// Writes `value` to the store, then caches it as most recently used.
    ///
    /// If the store write fails the index is left untouched. Inserting a
    /// new key may evict the oldest entry; if deleting that entry from the
    /// store fails, this call fails with [`StorageError::Eviction`] even
    /// though `value` is already stored.
    pub fn set(&self, ctx: &Context, key: &str, value: impl Into<Bytes>) -> Result<()> {
        let value = value.into();
        let mut guard = self.state.lock();

        self.storage.set(ctx, key, &value)?;

        let state = &mut *guard;
        let replaced = state
            .index
            .insert(key.to_string(), CacheEntry::new(value))
            .is_some();
        if replaced {
            debug!(key, "Cache entry refreshed");
            return Ok(());
        }

        self.evict_overflow(ctx, state)
    }

    // == Delete ==
    /// Drops `key` from the index, then deletes it from the store.
    ///
    /// The store delete happens even if the key was not cached in memory.
    pub fn delete(&self, ctx: &Context, key: &str) -> Result<()> {
        let mut state = self.state.lock();

        if state.index.remove(key).is_some() {
            debug!(key, "Cache entry removed");
        }

        self.storage.delete(ctx, key)
    }

    // == Set Capacity ==
    /// Changes the capacity, evicting entries that no longer fit.
    pub fn set_capacity(&self, ctx: &Context, capacity: i64) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        state.capacity = capacity;
        self.evict_overflow(ctx, state)
    }

    // == Evict Overflow ==
    /// Pops least recently used entries until the index fits its capacity.
    ///
    /// Must be called with the state lock held.
    fn evict_overflow(&self, ctx: &Context, state: &mut CacheState) -> Result<()> {
        let limit = usize::try_from(state.capacity).unwrap_or(0);

        while state.index.len() > limit {
            let Some((key, entry)) = state.index.pop_oldest() else {
                break;
            };
            state.stats.record(CacheEvent::Eviction);

            if state.capacity <= 0 {
                debug!(key = %key, "Dropped entry from zero-capacity cache");
                continue;
            }

            debug!(key = %key, age_ms = entry.age_ms(), "Evicting least recently used entry");
            if let Err(e) = self.storage.delete(ctx, &key) {
                warn!(key = %key, error = %e, "Failed to delete evicted entry from storage");
                return Err(StorageError::Eviction(Box::new(e)));
            }
        }

        Ok(())
    }

    // == Introspection ==
    pub fn capacity(&self) -> i64 {
        self.state.lock().capacity
    }

    /// Number of entries held in the index.
    pub fn len(&self) -> usize {
        self.state.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().index.is_empty()
    }

    /// Whether `key` is held in the index. Does not affect recency.
    pub fn contains(&self, key: &str) -> bool {
        self.state.lock().index.contains(key)
    }

    /// Cached keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.state.lock().index.keys().map(str::to_string).collect()
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        state
            .stats
            .snapshot(state.index.len(), state.capacity, self.storage.size())
    }
}
