//! Request models for the image proxy API
//!
//! Parses the `/fill/<width>/<height>/<source-url>` path.

// == Fill Request ==
/// A parsed resize request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillRequest {
    /// Target width in pixels
    pub width: u32,
    /// Target height in pixels
    pub height: u32,
    /// Source URL, also the cache key
    pub url: String,
}

impl FillRequest {
    /// Parses the path remainder after `/fill/`.
    ///
    /// Everything after the height segment is rejoined on `/` as the source
    /// URL. Returns the client-facing error message on failure.
    pub fn parse(path: &str) -> Result<Self, String> {
        let path = path.strip_prefix('/').unwrap_or(path);
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() < 3 {
            return Err("Invalid URL format".to_string());
        }

        let width = parse_dimension(parts[0]).ok_or_else(|| "Invalid width".to_string())?;
        let height = parse_dimension(parts[1]).ok_or_else(|| "Invalid height".to_string())?;

        let url = parts[2..].join("/");
        if url.is_empty() {
            return Err("URL is required".to_string());
        }

        Ok(Self { width, height, url })
    }

    /// Appends a raw query string to the source URL.
    pub fn with_query(mut self, query: Option<&str>) -> Self {
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            self.url.push('?');
            self.url.push_str(query);
        }
        self
    }
}

/// Largest accepted width or height, in pixels.
pub const MAX_DIMENSION: u32 = 8192;

/// Pixel count in `1..=MAX_DIMENSION`.
fn parse_dimension(raw: &str) -> Option<u32> {
    raw.parse::<u32>()
        .ok()
        .filter(|v| (1..=MAX_DIMENSION).contains(v))
}
