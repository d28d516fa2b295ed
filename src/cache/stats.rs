//! Cache Statistics Module
//!
//! Diagnostic snapshot of a store: live size, keys and access counters.

use serde::Serialize;

// == Cache Stats ==
/// Best-effort snapshot of a cache store.
///
/// `keys` may include entries that have expired but have not been read or
/// swept yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of entries currently held
    pub size: usize,
    /// Keys currently held, sorted
    pub keys: Vec<String>,
    /// Number of reads served from the cache
    pub hits: u64,
    /// Number of reads that found nothing fresh
    pub misses: u64,
    /// Number of entries removed because their TTL elapsed
    pub expirations: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    // == Merge ==
    /// Folds another snapshot into this one.
    ///
    /// Used to report a repository backed by several stores as one unit.
    pub fn merge(&mut self, other: CacheStats) {
        self.size += other.size;
        self.keys.extend(other.keys);
        self.keys.sort();
        self.hits += other.hits;
        self.misses += other.misses;
        self.expirations += other.expirations;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.size, 0);
        assert!(stats.keys.is_empty());
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.expirations, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_merge_combines_snapshots() {
        let mut lists = CacheStats {
            size: 1,
            keys: vec!["comics_list_0_20".to_string()],
            hits: 2,
            misses: 1,
            expirations: 0,
        };
        let details = CacheStats {
            size: 1,
            keys: vec!["comics_detail_7".to_string()],
            hits: 0,
            misses: 3,
            expirations: 1,
        };

        lists.merge(details);

        assert_eq!(lists.size, 2);
        assert_eq!(lists.keys, vec!["comics_detail_7", "comics_list_0_20"]);
        assert_eq!(lists.hits, 2);
        assert_eq!(lists.misses, 4);
        assert_eq!(lists.expirations, 1);
    }
}
