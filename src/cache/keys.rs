//! Cache Key Module
//!
//! Deterministic fingerprints for the resource families the cache fronts.
//! Identical logical requests always produce the same key, and distinct page
//! windows or search terms never collide.

use std::fmt;

// == Resource Family ==
/// Catalog resource families served through the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceFamily {
    Comics,
    Characters,
}

impl ResourceFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceFamily::Comics => "comics",
            ResourceFamily::Characters => "characters",
        }
    }
}

impl fmt::Display for ResourceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Key Builders ==
/// Builds the key for a page of `family`.
///
/// A non-empty `query` yields `{family}_search_{query}_{offset}_{limit}`;
/// `None` or an empty query yields `{family}_list_{offset}_{limit}`.
pub fn list_key(family: &str, query: Option<&str>, offset: u32, limit: u32) -> String {
    match query.filter(|q| !q.is_empty()) {
        Some(query) => format!("{}_search_{}_{}_{}", family, query, offset, limit),
        None => format!("{}_list_{}_{}", family, offset, limit),
    }
}

/// Builds the key for a page of `family` scoped to a related resource.
///
/// Yields `{family}_by_{relation}_{value}_{offset}_{limit}`, e.g.
/// `characters_by_comic_82967_0_20`.
pub fn related_key(family: &str, relation: &str, value: &str, offset: u32, limit: u32) -> String {
    format!("{}_by_{}_{}_{}_{}", family, relation, value, offset, limit)
}

/// Builds the key for a single item of `family`.
pub fn detail_key(family: &str, id: u64) -> String {
    format!("{}_detail_{}", family, id)
}
