//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

// == Cache Entry ==
/// A single cached response and its validity window.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    /// The stored payload, never interpreted by the cache
    pub data: T,
    /// Creation timestamp (Unix milliseconds)
    pub stored_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates an entry stored at `now_ms` that lives for `ttl`.
    pub fn new(data: T, now_ms: u64, ttl: Duration) -> Self {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);

        Self {
            data,
            stored_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now_ms`.
    ///
    /// The deadline itself is still valid: an entry is only dead once the
    /// current time is strictly past `expires_at`.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms > self.expires_at
    }
}
