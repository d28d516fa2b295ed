//! Response DTOs for the catalog service API
//!
//! Defines the structure of outgoing cache diagnostic bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for `GET /cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    /// Snapshot of the comics stores
    pub comics: CacheStats,
    /// Snapshot of the characters stores
    pub characters: CacheStats,
    /// Entries held across all stores
    pub total_entries: usize,
    /// Hit rate across all stores
    pub hit_rate: f64,
}

impl CacheStatsResponse {
    pub fn new(comics: CacheStats, characters: CacheStats) -> Self {
        let mut combined = comics.clone();
        combined.merge(characters.clone());

        Self {
            total_entries: combined.size,
            hit_rate: combined.hit_rate(),
            comics,
            characters,
        }
    }
}

/// Response body for `DELETE /cache/:key`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub message: String,
    pub key: String,
    /// Whether an entry was actually removed
    pub removed: bool,
}

impl InvalidateResponse {
    pub fn new(key: impl Into<String>, removed: bool) -> Self {
        let key = key.into();
        let message = if removed {
            format!("Key '{}' invalidated", key)
        } else {
            format!("Key '{}' was not cached", key)
        };
        Self {
            message,
            key,
            removed,
        }
    }
}

/// Response body for `POST /cache/clear` and `POST /cache/sweep`
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceResponse {
    pub message: String,
    /// Entries removed by the operation
    pub removed: usize,
}

impl MaintenanceResponse {
    pub fn cleared(removed: usize) -> Self {
        Self {
            message: "Cache cleared".to_string(),
            removed,
        }
    }

    pub fn swept(removed: usize) -> Self {
        Self {
            message: format!("Swept {} expired entries", removed),
            removed,
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
