//! Cache Store Module
//!
//! Typed in-memory store with per-entry TTL and lazy eviction.

use std::collections::HashMap;
use std::time::Duration;

use tracing::trace;

use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock, DEFAULT_TTL};

// == Cache Store ==
/// In-memory key/value store whose entries expire independently.
///
/// The payload type is fixed per store. Reads are not side-effect free:
/// `get` and `has` remove an expired entry they come across, which is why
/// they take `&mut self`. Wrap the store in a lock when sharing it between
/// threads.
#[derive(Debug)]
pub struct CacheStore<T, C = SystemClock> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Access counters
    stats: CacheStats,
    /// TTL applied when `set` is called without one
    default_ttl: Duration,
    /// Time source
    clock: C,
}

impl<T> CacheStore<T> {
    // == Constructor ==
    /// Creates an empty store on the system clock.
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, SystemClock)
    }
}

impl<T> Default for CacheStore<T> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl<T, C: Clock> CacheStore<T, C> {
    /// Creates an empty store reading time from `clock`.
    pub fn with_clock(default_ttl: Duration, clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            default_ttl,
            clock,
        }
    }

    // == Set ==
    /// Stores `data` under `key`, replacing any previous entry.
    ///
    /// Both the stored time and the deadline are refreshed on overwrite.
    /// `None` uses the store's default TTL.
    pub fn set(&mut self, key: impl Into<String>, data: T, ttl: Option<Duration>) {
        let key = key.into();
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(data, self.clock.now_ms(), ttl);

        trace!(key = %key, expires_at = entry.expires_at, "cache set");
        self.entries.insert(key, entry);
    }

    // == Get ==
    /// Returns a copy of the payload if the entry exists and is fresh.
    ///
    /// An expired entry is removed from the store before `None` is returned.
    pub fn get(&mut self, key: &str) -> Option<T>
    where
        T: Clone,
    {
        if self.evict_if_expired(key) {
            self.stats.record_miss();
            return None;
        }

        match self.entries.get(key) {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.data.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Has ==
    /// Returns whether a fresh entry exists, evicting it if expired.
    ///
    /// Does not touch the hit/miss counters.
    pub fn has(&mut self, key: &str) -> bool {
        !self.evict_if_expired(key) && self.entries.contains_key(key)
    }

    // == Delete ==
    /// Removes the entry for `key`. Returns whether one was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Clear ==
    /// Empties the store and resets its counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::new();
    }

    // == Sweep Expired ==
    /// Removes every entry whose deadline has passed.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();

        self.entries.retain(|_, entry| !entry.is_expired(now));

        let removed = before - self.entries.len();
        self.stats.record_expirations(removed);
        removed
    }

    // == Stats ==
    /// Returns a snapshot of the store.
    pub fn stats(&self) -> CacheStats {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();

        CacheStats {
            size: self.entries.len(),
            keys,
            ..self.stats.clone()
        }
    }

    // == Length ==
    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the TTL used when `set` is called without one.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // Removes `key` if it is present and expired. Returns true if it did.
    fn evict_if_expired(&mut self, key: &str) -> bool {
        let now = self.clock.now_ms();
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired(now));

        if expired {
            self.entries.remove(key);
            self.stats.record_expirations(1);
            trace!(key = %key, "cache entry expired on read");
        }
        expired
    }
}
