//! In-memory backing store.

use std::collections::HashMap;
use std::io::Cursor;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::storage::{BlobReader, Context, Result, Storage, StorageError};

// == Memory Storage ==
/// Unbounded key/value map guarded by a read/write lock.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, Bytes>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, ctx: &Context, key: &str) -> Result<BlobReader> {
        ctx.check()?;

        let data = self.data.read();
        let value = data
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;

        Ok(Box::new(Cursor::new(value)))
    }

    fn set(&self, ctx: &Context, key: &str, data: &[u8]) -> Result<()> {
        ctx.check()?;

        self.data
            .write()
            .insert(key.to_string(), Bytes::copy_from_slice(data));
        Ok(())
    }

    fn delete(&self, ctx: &Context, key: &str) -> Result<()> {
        ctx.check()?;

        self.data.write().remove(key);
        Ok(())
    }

    fn size(&self) -> usize {
        self.data.read().len()
    }
}
