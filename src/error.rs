//! Error types for the image proxy
//!
//! Provides unified request-level error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::storage::StorageError;

// == Proxy Error Enum ==
/// Errors surfaced by the image processor and HTTP handlers.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Malformed request path
    #[error("{0}")]
    InvalidRequest(String),

    /// Cache lookup failed for a reason other than not-found
    #[error("failed to get from cache: {0}")]
    CacheRead(#[source] StorageError),

    /// Storing the fetched original failed
    #[error("failed to cache image: {0}")]
    CacheWrite(#[source] StorageError),

    /// Origin request could not be completed
    #[error("failed to download image: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Origin answered with a non-200 status
    #[error("server returned status: {0}")]
    UpstreamStatus(u16),

    #[error("failed to decode cached image: {0}")]
    DecodeCached(#[source] image::ImageError),

    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::Fetch(_) | ProxyError::UpstreamStatus(_) => StatusCode::BAD_GATEWAY,
            ProxyError::CacheRead(_)
            | ProxyError::CacheWrite(_)
            | ProxyError::DecodeCached(_)
            | ProxyError::Decode(_)
            | ProxyError::Encode(_)
            | ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
/// Plain-text body carrying the error message.
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the image proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;
