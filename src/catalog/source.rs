//! Catalog Source
//!
//! The data source the repositories fall back to on a cache miss.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::cache::{keys, ResourceFamily};
use crate::catalog::{Page, Resource};
use crate::error::{AppError, Result};

/// Page size used when a caller does not ask for one
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Largest page size a caller may ask for
pub const MAX_PAGE_LIMIT: u32 = 100;

// == Page Query ==
/// Parameters identifying one window of a collection, optionally filtered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub query: Option<String>,
    pub offset: u32,
    pub limit: u32,
}

impl PageQuery {
    pub fn list(offset: u32, limit: u32) -> Self {
        Self {
            query: None,
            offset,
            limit,
        }
    }

    pub fn search(query: impl Into<String>, offset: u32, limit: u32) -> Self {
        Self {
            query: Some(query.into()),
            offset,
            limit,
        }
    }

    /// Returns the trimmed search term, or `None` when the query is blank.
    pub fn search_term(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    /// Cache key for this window of `family`.
    pub fn cache_key(&self, family: &str) -> String {
        keys::list_key(family, self.search_term(), self.offset, self.limit)
    }

    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 || self.limit > MAX_PAGE_LIMIT {
            return Err(AppError::InvalidRequest(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_LIMIT
            )));
        }
        Ok(())
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::list(0, DEFAULT_PAGE_LIMIT)
    }
}

// == Relation ==
/// Another catalog resource a listing can be scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    /// Items appearing in the comic with this id
    Comic(u64),
    /// Items belonging to a series
    Series(String),
    /// Items credited to a creator
    Creator(String),
}

impl Relation {
    pub fn kind(&self) -> &'static str {
        match self {
            Relation::Comic(_) => "comic",
            Relation::Series(_) => "series",
            Relation::Creator(_) => "creator",
        }
    }

    /// The scoping value with surrounding whitespace removed.
    pub fn value(&self) -> String {
        match self {
            Relation::Comic(id) => id.to_string(),
            Relation::Series(value) | Relation::Creator(value) => value.trim().to_string(),
        }
    }

    /// Whether listings of `family` can be scoped this way.
    ///
    /// Characters are listed per comic or per series; comics per series or
    /// per creator.
    pub fn applies_to(&self, family: ResourceFamily) -> bool {
        matches!(
            (family, self),
            (ResourceFamily::Characters, Relation::Comic(_))
                | (ResourceFamily::Characters, Relation::Series(_))
                | (ResourceFamily::Comics, Relation::Series(_))
                | (ResourceFamily::Comics, Relation::Creator(_))
        )
    }

    /// Cache key for one window of `family` scoped by this relation.
    pub fn cache_key(&self, family: &str, offset: u32, limit: u32) -> String {
        keys::related_key(family, self.kind(), &self.value(), offset, limit)
    }

    /// Rejects relations `family` cannot be listed by, and blank values.
    pub fn validate(&self, family: ResourceFamily) -> Result<()> {
        if !self.applies_to(family) {
            return Err(AppError::InvalidRequest(format!(
                "{} cannot be listed by {}",
                family,
                self.kind()
            )));
        }
        if self.value().is_empty() {
            return Err(AppError::InvalidRequest(format!("{} must not be blank", self.kind())));
        }
        Ok(())
    }
}

// == Catalog Source Trait ==
/// Remote fetch of catalog resources.
///
/// Implementations perform I/O and report failures; the repositories never
/// cache a failed fetch.
pub trait CatalogSource: Send + Sync + 'static {
    /// Fetches one window of `R`, filtered when the query has a search term.
    fn fetch_page<R: Resource>(
        &self,
        query: &PageQuery,
    ) -> impl Future<Output = Result<Page<R>>> + Send;

    /// Fetches a single `R` by id. `Ok(None)` when the upstream has no such item.
    fn fetch_one<R: Resource>(&self, id: u64) -> impl Future<Output = Result<Option<R>>> + Send;

    /// Fetches one window of `R` scoped to `relation`. The query's search
    /// term is not used.
    fn fetch_related<R: Resource>(
        &self,
        relation: &Relation,
        query: &PageQuery,
    ) -> impl Future<Output = Result<Page<R>>> + Send;
}
