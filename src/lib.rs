//! Image Proxy - an image-resizing reverse proxy
//!
//! Fetches source images over HTTP, resizes them on demand, and keeps the
//! originals in a bounded LRU cache over a pluggable backing store.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod processor;
pub mod storage;

pub use api::AppState;
pub use cache::BoundedCache;
pub use config::Config;
pub use storage::{Context, FileStorage, MemoryStorage, Storage, StorageError};
