//! Cache Module
//!
//! TTL-bounded response cache for idempotent catalog reads.

mod clock;
mod entry;
pub mod keys;
mod stats;
mod store;


use std::time::Duration;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use keys::{detail_key, list_key, related_key, ResourceFamily};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// TTL applied when a caller stores an entry without one
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// TTL for paginated list and search responses
pub const LIST_TTL: Duration = Duration::from_secs(5 * 60);

/// TTL for single-item detail responses
pub const DETAIL_TTL: Duration = Duration::from_secs(15 * 60);

// == TTL Policy ==
/// Per-resource-class lifetimes used by callers when populating the cache.
///
/// Details outlive listings since single items change less often than the
/// aggregate pages that contain them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub list: Duration,
    pub detail: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            list: LIST_TTL,
            detail: DETAIL_TTL,
        }
    }
}
