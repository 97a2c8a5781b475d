//! API Handlers
//!
//! HTTP request handlers for each image proxy endpoint.

use std::sync::Arc;

use anyhow::Context as _;
use axum::{
    extract::{Path, RawQuery, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::cache::BoundedCache;
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::models::{FillRequest, HealthResponse, StatsResponse};
use crate::processor::ImageProcessor;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Resize pipeline, which owns the shared cache
    pub processor: Arc<ImageProcessor>,
}

impl AppState {
    pub fn new(processor: ImageProcessor) -> Self {
        Self {
            processor: Arc::new(processor),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the configured backing store and hands it to the cache.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let storage = config
            .build_storage()
            .context("failed to initialize storage")?;
        let cache = Arc::new(BoundedCache::new(config.cache_capacity, storage));
        let processor =
            ImageProcessor::new(cache, config).context("failed to initialize image processor")?;
        Ok(Self::new(processor))
    }

    pub fn cache(&self) -> &Arc<BoundedCache> {
        self.processor.cache()
    }
}

/// Handler for GET /fill/*path
///
/// Returns the source image resized to the requested dimensions.
pub async fn fill_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response> {
    let req = FillRequest::parse(&path)
        .map_err(ProxyError::InvalidRequest)?
        .with_query(query.as_deref());

    let (data, content_type) = state
        .processor
        .process_image(&req.url, req.width, req.height)
        .await?;

    Ok(([(header::CONTENT_TYPE, content_type)], data).into_response())
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let cache = Arc::clone(state.cache());
    let stats = tokio::task::spawn_blocking(move || cache.stats())
        .await
        .map_err(|e| ProxyError::Internal(e.to_string()))?;

    Ok(Json(StatsResponse::from(stats)))
}

/// Handler for GET /health
///
/// Always reports healthy.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageKind;
    use crate::storage::Context;
    use axum::http::StatusCode;

    fn memory_state() -> AppState {
        let config = Config {
            storage_kind: StorageKind::Memory,
            ..Config::default()
        };
        AppState::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fill_handler_invalid_width() {
        let state = memory_state();

        let err = fill_handler(State(state), Path("abc/10/host/a.jpg".to_string()), RawQuery(None))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid width");
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = memory_state();
        state
            .cache()
            .set(&Context::background(), "key", "value")
            .unwrap();

        let response = stats_handler(State(state)).await.unwrap();
        assert_eq!(response.entries, 1);
        assert_eq!(response.capacity, 5);
        assert_eq!(response.stored_entries, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
