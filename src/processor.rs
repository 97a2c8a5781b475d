//! Image Processor
//!
//! Fetches originals through the bounded cache, resizes them and encodes
//! the result as JPEG. Cache and codec work runs on the blocking pool.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::cache::BoundedCache;
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::storage::Context;

/// Content type of every processed image.
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Quality used when re-encoding originals for the cache.
const ORIGINAL_JPEG_QUALITY: u8 = 95;

// == Image Processor ==
/// Resizes source images, caching the re-encoded original by source URL.
pub struct ImageProcessor {
    cache: Arc<BoundedCache>,
    client: Client,
    jpeg_quality: u8,
    request_timeout: Duration,
}

impl ImageProcessor {
    // == Constructor ==
    pub fn new(cache: Arc<BoundedCache>, config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.fetch_timeout())
            .build()
            .map_err(|e| ProxyError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            cache,
            client,
            jpeg_quality: config.jpeg_quality,
            request_timeout: config.request_timeout(),
        })
    }

    pub fn cache(&self) -> &Arc<BoundedCache> {
        &self.cache
    }

    // == Process Image ==
    /// Returns `url` resized to exactly `width` x `height`, JPEG encoded.
    ///
    /// The request context is cancelled if this future is dropped.
    pub async fn process_image(
        &self,
        url: &str,
        width: u32,
        height: u32,
    ) -> Result<(Vec<u8>, &'static str)> {
        let ctx = Context::with_timeout(self.request_timeout);
        let _cancel = CancelOnDrop(ctx.clone());

        let original = self.original_image(&ctx, url).await?;

        let quality = self.jpeg_quality;
        let data = run_blocking(move || {
            let resized = original.resize_exact(width, height, FilterType::Lanczos3);
            encode_jpeg(&resized, quality).map_err(ProxyError::Encode)
        })
        .await?;

        debug!(url, width, height, size = data.len(), "Image processed");
        Ok((data, JPEG_CONTENT_TYPE))
    }

    // == Original Image ==
    /// Returns the decoded original for `url`, from cache or from origin.
    ///
    /// Origin fetches are re-encoded as JPEG and written to the cache.
    pub async fn original_image(&self, ctx: &Context, url: &str) -> Result<DynamicImage> {
        let cache = Arc::clone(&self.cache);
        let lookup_ctx = ctx.clone();
        let key = url.to_string();
        let cached = run_blocking(move || Ok(cache.get(&lookup_ctx, &key))).await?;

        match cached {
            Ok(bytes) => {
                debug!(url, size = bytes.len(), "Original served from cache");
                return run_blocking(move || {
                    image::load_from_memory(&bytes).map_err(ProxyError::DecodeCached)
                })
                .await;
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                if e.is_context_error() {
                    debug!(url, error = %e, "Cache lookup abandoned");
                } else {
                    warn!(url, error = %e, "Cache lookup failed");
                }
                return Err(ProxyError::CacheRead(e));
            }
        }

        let body = self.fetch_origin(url).await?;
        let (original, encoded) = run_blocking(move || {
            let original = image::load_from_memory(&body).map_err(ProxyError::Decode)?;
            let encoded =
                encode_jpeg(&original, ORIGINAL_JPEG_QUALITY).map_err(ProxyError::Encode)?;
            Ok((original, encoded))
        })
        .await?;

        let cache = Arc::clone(&self.cache);
        let store_ctx = ctx.clone();
        let key = url.to_string();
        run_blocking(move || {
            cache
                .set(&store_ctx, &key, encoded)
                .map_err(ProxyError::CacheWrite)
        })
        .await?;

        Ok(original)
    }

    // == Fetch Origin ==
    async fn fetch_origin(&self, url: &str) -> Result<Bytes> {
        let target = origin_url(url);
        debug!(url = %target, "Fetching original from origin");

        let response = self.client.get(&target).send().await?;
        if response.status() != StatusCode::OK {
            warn!(status = %response.status(), url = %target, "Origin returned error status");
            return Err(ProxyError::UpstreamStatus(response.status().as_u16()));
        }

        Ok(response.bytes().await?)
    }
}

/// Cancels the wrapped context when dropped.
struct CancelOnDrop(Context);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Source URLs without a scheme are fetched over plain HTTP.
pub fn origin_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

/// Encodes `img` as baseline JPEG, dropping any alpha channel.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> image::ImageResult<Vec<u8>> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality).encode_image(&rgb)?;
    Ok(buf)
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ProxyError::Internal(format!("blocking task failed: {e}")))?
}
