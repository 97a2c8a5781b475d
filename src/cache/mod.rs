//! Cache Module
//!
//! Bounded LRU cache over a pluggable backing store.

mod bounded;
mod entry;
mod lru;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use bounded::BoundedCache;
pub use entry::CacheEntry;
pub use lru::{Keys, RecencyIndex};
pub use stats::{CacheEvent, CacheStats};
