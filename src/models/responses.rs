//! Response DTOs for the image proxy API
//!
//! Defines the JSON bodies of the auxiliary endpoints.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Reads answered from memory
    pub hits: u64,
    /// Reads that missed memory
    pub misses: u64,
    /// Misses repopulated from the backing store
    pub store_reads: u64,
    /// Entries evicted by capacity
    pub evictions: u64,
    /// Entries currently held in memory
    pub entries: usize,
    /// Configured in-memory capacity
    pub capacity: i64,
    /// Entries held by the backing store
    pub stored_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            store_reads: stats.store_reads,
            evictions: stats.evictions,
            entries: stats.entries,
            capacity: stats.capacity,
            stored_entries: stats.stored_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_response_from_stats() {
        let stats = CacheStats {
            hits: 8,
            misses: 2,
            store_reads: 1,
            evictions: 3,
            entries: 5,
            capacity: 5,
            stored_entries: 6,
        };
        let resp = StatsResponse::from(stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.stored_entries, 6);

        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"evictions\":3"));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
