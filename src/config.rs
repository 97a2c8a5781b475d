//! Configuration Module
//!
//! Handles loading server configuration from environment variables and
//! constructing the selected backing store.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::storage::{FileStorage, MemoryStorage, Storage, StorageError};

// == Storage Kind ==
/// Which backing store the process runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    File,
}

impl FromStr for StorageKind {
    type Err = std::convert::Infallible;

    /// `memory` selects the in-memory store; anything else is filesystem.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.trim().eq_ignore_ascii_case("memory") {
            StorageKind::Memory
        } else {
            StorageKind::File
        })
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries held in memory (non-positive = pass-through)
    pub cache_capacity: i64,
    /// Backing store selection
    pub storage_kind: StorageKind,
    /// Base directory for the filesystem store
    pub cache_dir: PathBuf,
    /// HTTP server port
    pub server_port: u16,
    /// Origin fetch timeout in seconds
    pub fetch_timeout: u64,
    /// Per-request deadline in seconds
    pub request_timeout: u64,
    /// JPEG quality for resized output (1-100)
    pub jpeg_quality: u8,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - In-memory cache entries (default: 5)
    /// - `STORAGE_TYPE` - `memory` or anything else for files (default: file)
    /// - `CACHE_DIR` - Filesystem store directory (default: ./image_cache)
    /// - `PORT` - HTTP server port (default: 8081)
    /// - `FETCH_TIMEOUT` - Origin fetch timeout in seconds (default: 30)
    /// - `REQUEST_TIMEOUT` - Per-request deadline in seconds (default: 60)
    /// - `JPEG_QUALITY` - Output JPEG quality (default: 85)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_capacity: parse_env("CACHE_CAPACITY").unwrap_or(defaults.cache_capacity),
            storage_kind: parse_env("STORAGE_TYPE").unwrap_or(defaults.storage_kind),
            cache_dir: env::var("CACHE_DIR")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            server_port: parse_env("PORT").unwrap_or(defaults.server_port),
            fetch_timeout: parse_env("FETCH_TIMEOUT").unwrap_or(defaults.fetch_timeout),
            request_timeout: parse_env("REQUEST_TIMEOUT").unwrap_or(defaults.request_timeout),
            jpeg_quality: parse_env::<u8>("JPEG_QUALITY")
                .filter(|q| (1..=100).contains(q))
                .unwrap_or(defaults.jpeg_quality),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    // == Build Storage ==
    /// Constructs the configured backing store.
    ///
    /// Fails only if the filesystem store cannot be opened.
    pub fn build_storage(&self) -> Result<Arc<dyn Storage>, StorageError> {
        Ok(match self.storage_kind {
            StorageKind::Memory => Arc::new(MemoryStorage::new()),
            StorageKind::File => Arc::new(FileStorage::new(&self.cache_dir)?),
        })
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: 5,
            storage_kind: StorageKind::File,
            cache_dir: PathBuf::from("./image_cache"),
            server_port: 8081,
            fetch_timeout: 30,
            request_timeout: 60,
            jpeg_quality: 85,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_capacity, 5);
        assert_eq!(config.storage_kind, StorageKind::File);
        assert_eq!(config.cache_dir, PathBuf::from("./image_cache"));
        assert_eq!(config.server_port, 8081);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert_eq!(config.jpeg_quality, 85);
    }

    #[test]
    fn test_storage_kind_parse() {
        assert_eq!("memory".parse::<StorageKind>(), Ok(StorageKind::Memory));
        assert_eq!("MEMORY".parse::<StorageKind>(), Ok(StorageKind::Memory));
        assert_eq!("file".parse::<StorageKind>(), Ok(StorageKind::File));
        assert_eq!("anything".parse::<StorageKind>(), Ok(StorageKind::File));
    }

    #[test]
    fn test_build_memory_storage() {
        let config = Config {
            storage_kind: StorageKind::Memory,
            ..Config::default()
        };
        let storage = config.build_storage().unwrap();
        assert_eq!(storage.size(), 0);
    }

    #[test]
    fn test_build_file_storage() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            storage_kind: StorageKind::File,
            cache_dir: dir.path().join("images"),
            ..Config::default()
        };
        config.build_storage().unwrap();
        assert!(dir.path().join("images").is_dir());
    }

    #[test]
    fn test_build_file_storage_bad_parent() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            storage_kind: StorageKind::File,
            cache_dir: dir.path().join("missing").join("images"),
            ..Config::default()
        };
        assert!(config.build_storage().is_err());
    }
}
