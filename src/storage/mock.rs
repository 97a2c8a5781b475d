//! Recording store used by cache unit tests.

use std::collections::HashSet;

use parking_lot::Mutex;

use crate::storage::{BlobReader, Context, MemoryStorage, Result, Storage, StorageError};

/// A single call observed by [`RecordingStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Get(String),
    Set(String),
    Delete(String),
}

/// Memory store that records every call and can fail chosen writes or deletes.
#[derive(Debug, Default)]
pub struct RecordingStorage {
    inner: MemoryStorage,
    calls: Mutex<Vec<StoreCall>>,
    failing_deletes: Mutex<HashSet<String>>,
    failing_sets: Mutex<HashSet<String>>,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_delete(&self, key: &str) {
        self.failing_deletes.lock().insert(key.to_string());
    }

    pub fn fail_set(&self, key: &str) {
        self.failing_sets.lock().insert(key.to_string());
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn delete_count(&self, key: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, StoreCall::Delete(k) if k == key))
            .count()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.get(&Context::background(), key).is_ok()
    }
}

impl Storage for RecordingStorage {
    fn get(&self, ctx: &Context, key: &str) -> Result<BlobReader> {
        self.calls.lock().push(StoreCall::Get(key.to_string()));
        self.inner.get(ctx, key)
    }

    fn set(&self, ctx: &Context, key: &str, data: &[u8]) -> Result<()> {
        self.calls.lock().push(StoreCall::Set(key.to_string()));
        if self.failing_sets.lock().contains(key) {
            return Err(StorageError::Backend("storage error".to_string()));
        }
        self.inner.set(ctx, key, data)
    }

    fn delete(&self, ctx: &Context, key: &str) -> Result<()> {
        self.calls.lock().push(StoreCall::Delete(key.to_string()));
        if self.failing_deletes.lock().contains(key) {
            return Err(StorageError::Backend("storage error".to_string()));
        }
        self.inner.delete(ctx, key)
    }

    fn size(&self) -> usize {
        self.inner.size()
    }
}
