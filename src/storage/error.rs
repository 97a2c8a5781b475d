//! Storage error types.

use std::io;

use thiserror::Error;

// == Storage Error Enum ==
/// Errors surfaced by backing stores and by the bounded cache.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Key absent from the store
    #[error("key not found: {0}")]
    NotFound(String),

    /// The caller's context was cancelled
    #[error("context canceled")]
    Cancelled,

    /// The caller's context deadline passed
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// Invalid construction argument
    #[error("{0}")]
    InvalidPath(String),

    /// Filesystem failure, tagged with the operation that hit it
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
    },

    /// Failure reported by a third-party store
    #[error("{0}")]
    Backend(String),

    /// Deleting an evicted entry from the store failed.
    ///
    /// The triggering operation's own write or read has already committed.
    #[error("failed to delete from storage: {0}")]
    Eviction(#[source] Box<StorageError>),
}

impl StorageError {
    /// Wraps an I/O error with the operation it came from.
    pub fn io(context: &'static str, source: io::Error) -> Self {
        Self::Io { context, source }
    }

    /// Returns true for the "key absent" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true when the context was cancelled or expired.
    pub fn is_context_error(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

// == Result Type Alias ==
/// Convenience Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
