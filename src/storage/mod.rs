//! Storage Module
//!
//! Key/value byte stores that back the bounded cache.
//!
//! # Backends
//! - `MemoryStorage` - unbounded in-process map
//! - `FileStorage` - one file per key under a base directory

mod context;
mod error;
mod file;
mod memory;

#[cfg(test)]
pub(crate) mod mock;

use std::io::Read;

pub use context::Context;
pub use error::{Result, StorageError};
pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Readable stream returned by [`Storage::get`].
pub type BlobReader = Box<dyn Read + Send>;

// == Storage Trait ==
/// Contract every backing store implements.
///
/// All operations take the caller's [`Context`] first and fail fast,
/// without touching state, when it is already cancelled or expired.
pub trait Storage: Send + Sync {
    /// Opens the blob stored under `key`.
    ///
    /// Fails with [`StorageError::NotFound`] when the key is absent.
    fn get(&self, ctx: &Context, key: &str) -> Result<BlobReader>;

    /// Stores `data` under `key`, replacing any previous value.
    fn set(&self, ctx: &Context, key: &str, data: &[u8]) -> Result<()>;

    /// Removes `key`. Deleting an absent key succeeds.
    fn delete(&self, ctx: &Context, key: &str) -> Result<()>;

    /// Number of live entries held by the store.
    fn size(&self) -> usize;
}
