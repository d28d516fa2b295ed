//! Catalog Repository
//!
//! Read-through cache in front of a `CatalogSource` for one resource type.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{keys, CacheStats, CacheStore, Clock, ResourceFamily, SystemClock, TtlPolicy};
use crate::catalog::{CatalogSource, Page, PageQuery, Relation, Resource};
use crate::error::Result;

// == Catalog Repository ==
/// Serves pages and details of `R`, consulting the cache before the source.
///
/// Pages and details live in two typed stores. Each store sits behind a
/// lock that is taken for writing even on reads, since a lookup may evict.
/// No lock is held while the source is being awaited, so concurrent misses
/// for the same key may both fetch; the last write wins.
pub struct CatalogRepository<R, S, C = SystemClock> {
    source: Arc<S>,
    pages: RwLock<CacheStore<Page<R>, C>>,
    details: RwLock<CacheStore<R, C>>,
    ttl: TtlPolicy,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource, S: CatalogSource> CatalogRepository<R, S> {
    // == Constructor ==
    pub fn new(source: Arc<S>, ttl: TtlPolicy, default_ttl: Duration) -> Self {
        Self::with_clock(source, ttl, default_ttl, SystemClock)
    }
}

impl<R, S, C> CatalogRepository<R, S, C>
where
    R: Resource,
    S: CatalogSource,
    C: Clock + Clone + Send + Sync,
{
    /// Creates a repository whose stores read time from `clock`.
    pub fn with_clock(source: Arc<S>, ttl: TtlPolicy, default_ttl: Duration, clock: C) -> Self {
        Self {
            source,
            pages: RwLock::new(CacheStore::with_clock(default_ttl, clock.clone())),
            details: RwLock::new(CacheStore::with_clock(default_ttl, clock)),
            ttl,
            _resource: PhantomData,
        }
    }

    pub fn family(&self) -> ResourceFamily {
        R::FAMILY
    }

    // == List ==
    /// Returns an unfiltered window of the collection.
    pub async fn list(&self, offset: u32, limit: u32) -> Result<Page<R>> {
        self.page(PageQuery::list(offset, limit)).await
    }

    // == Search ==
    /// Returns a filtered window. A blank query behaves like `list`.
    pub async fn search(&self, query: &str, offset: u32, limit: u32) -> Result<Page<R>> {
        self.page(PageQuery::search(query, offset, limit)).await
    }

    /// Returns the window described by `query`, from cache when fresh.
    pub async fn page(&self, query: PageQuery) -> Result<Page<R>> {
        query.validate()?;
        let key = query.cache_key(R::FAMILY.as_str());

        let cached = self.pages.write().await.get(&key);
        if let Some(page) = cached {
            debug!(key = %key, "page served from cache");
            return Ok(page);
        }

        debug!(key = %key, "page cache miss, fetching from source");
        let page = self.source.fetch_page::<R>(&query).await?;

        self.pages
            .write()
            .await
            .set(key, page.clone(), Some(self.ttl.list));
        Ok(page)
    }

    // == Related ==
    /// Returns a window of `R` scoped to another resource, from cache when
    /// fresh. Cached for the list TTL.
    pub async fn related(&self, relation: &Relation, offset: u32, limit: u32) -> Result<Page<R>> {
        let query = PageQuery::list(offset, limit);
        query.validate()?;
        relation.validate(R::FAMILY)?;
        let key = relation.cache_key(R::FAMILY.as_str(), offset, limit);

        let cached = self.pages.write().await.get(&key);
        if let Some(page) = cached {
            debug!(key = %key, "related page served from cache");
            return Ok(page);
        }

        debug!(key = %key, "related page cache miss, fetching from source");
        let page = self.source.fetch_related::<R>(relation, &query).await?;

        self.pages
            .write()
            .await
            .set(key, page.clone(), Some(self.ttl.list));
        Ok(page)
    }

    // == Detail ==
    /// Returns a single item, from cache when fresh.
    ///
    /// Unknown ids are not cached, so a later request asks the source again.
    pub async fn detail(&self, id: u64) -> Result<Option<R>> {
        let key = keys::detail_key(R::FAMILY.as_str(), id);

        let cached = self.details.write().await.get(&key);
        if let Some(item) = cached {
            debug!(key = %key, "detail served from cache");
            return Ok(Some(item));
        }

        debug!(key = %key, "detail cache miss, fetching from source");
        let item = self.source.fetch_one::<R>(id).await?;

        if let Some(item) = &item {
            self.details
                .write()
                .await
                .set(key, item.clone(), Some(self.ttl.detail));
        }
        Ok(item)
    }

    // == Invalidate ==
    /// Drops `key` from both stores. Returns whether anything was removed.
    pub async fn invalidate(&self, key: &str) -> bool {
        let from_pages = self.pages.write().await.delete(key);
        let from_details = self.details.write().await.delete(key);
        from_pages || from_details
    }

    /// Empties both stores.
    pub async fn clear(&self) {
        self.pages.write().await.clear();
        self.details.write().await.clear();
    }

    /// Removes expired entries from both stores. Returns the count removed.
    pub async fn sweep_expired(&self) -> usize {
        let pages = self.pages.write().await.sweep_expired();
        let details = self.details.write().await.sweep_expired();
        pages + details
    }

    /// Combined snapshot of both stores.
    pub async fn stats(&self) -> CacheStats {
        let mut stats = self.pages.read().await.stats();
        stats.merge(self.details.read().await.stats());
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::catalog::{Character, Comic};
    use crate::error::AppError;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    const MISSING_ID: u64 = 404;

    // Source that fabricates results and counts how often it is asked
    #[derive(Default)]
    struct FakeSource {
        page_calls: AtomicUsize,
        detail_calls: AtomicUsize,
        failing: AtomicBool,
    }

    impl CatalogSource for FakeSource {
        async fn fetch_page<R: Resource>(&self, query: &PageQuery) -> Result<Page<R>> {
            self.page_calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(AppError::Upstream("connection refused".to_string()));
            }
            serde_json::from_value(json!({
                "offset": query.offset,
                "limit": query.limit,
                "total": 1000,
                "count": 1,
                "results": [{ "id": query.offset + 1, "title": query.search_term().unwrap_or_default(), "name": "x" }]
            }))
            .map_err(|e| AppError::Decode(e.to_string()))
        }

        async fn fetch_one<R: Resource>(&self, id: u64) -> Result<Option<R>> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(AppError::Upstream("connection refused".to_string()));
            }
            if id == MISSING_ID {
                return Ok(None);
            }
            serde_json::from_value(json!({ "id": id }))
                .map(Some)
                .map_err(|e| AppError::Decode(e.to_string()))
        }

        async fn fetch_related<R: Resource>(
            &self,
            relation: &Relation,
            query: &PageQuery,
        ) -> Result<Page<R>> {
            self.page_calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(AppError::Upstream("connection refused".to_string()));
            }
            serde_json::from_value(json!({
                "offset": query.offset,
                "limit": query.limit,
                "total": 1,
                "count": 1,
                "results": [{ "id": 1, "title": relation.value(), "name": relation.value() }]
            }))
            .map_err(|e| AppError::Decode(e.to_string()))
        }
    }

    fn comics_repo() -> (
        CatalogRepository<Comic, FakeSource, ManualClock>,
        Arc<FakeSource>,
        ManualClock,
    ) {
        let source = Arc::new(FakeSource::default());
        let clock = ManualClock::new(0);
        let repo = CatalogRepository::with_clock(
            source.clone(),
            TtlPolicy::default(),
            crate::cache::DEFAULT_TTL,
            clock.clone(),
        );
        (repo, source, clock)
    }

    #[tokio::test]
    async fn test_list_served_from_cache_on_repeat() {
        let (repo, source, _) = comics_repo();

        let first = repo.list(0, 20).await.unwrap();
        let second = repo.list(0, 20).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.page_calls.load(Ordering::SeqCst), 1);

        let stats = repo.stats().await;
        assert_eq!(stats.keys, vec!["comics_list_0_20"]);
        assert_eq!(stats.hits, 1);
    }

    #[tokio::test]
    async fn test_list_refetched_after_ttl() {
        let (repo, source, clock) = comics_repo();

        repo.list(0, 20).await.unwrap();
        clock.advance(TtlPolicy::default().list.as_millis() as u64 + 1);
        repo.list(0, 20).await.unwrap();

        assert_eq!(source.page_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_search_and_list_cached_separately() {
        let (repo, source, _) = comics_repo();

        repo.list(20, 20).await.unwrap();
        let found = repo.search("thor", 20, 20).await.unwrap();
        repo.search("thor", 20, 20).await.unwrap();

        assert_eq!(found.results[0].title, "thor");
        assert_eq!(source.page_calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            repo.stats().await.keys,
            vec!["comics_list_20_20", "comics_search_thor_20_20"]
        );
    }

    #[tokio::test]
    async fn test_blank_search_shares_list_entry() {
        let (repo, source, _) = comics_repo();

        repo.list(0, 20).await.unwrap();
        repo.search("", 0, 20).await.unwrap();

        assert_eq!(source.page_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_detail_outlives_list_ttl() {
        let (repo, source, clock) = comics_repo();

        repo.detail(20).await.unwrap();
        clock.advance(TtlPolicy::default().list.as_millis() as u64 + 1);
        let comic = repo.detail(20).await.unwrap().unwrap();

        assert_eq!(comic.id, 20);
        assert_eq!(source.detail_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_detail_is_not_cached() {
        let (repo, source, _) = comics_repo();

        assert!(repo.detail(MISSING_ID).await.unwrap().is_none());
        assert!(repo.detail(MISSING_ID).await.unwrap().is_none());

        assert_eq!(source.detail_calls.load(Ordering::SeqCst), 2);
        assert_eq!(repo.stats().await.size, 0);
    }

    #[tokio::test]
    async fn test_source_errors_propagate_and_are_not_cached() {
        let (repo, source, _) = comics_repo();
        source.failing.store(true, Ordering::SeqCst);

        let result = repo.list(0, 20).await;
        assert!(matches!(result, Err(AppError::Upstream(_))));
        assert_eq!(repo.stats().await.size, 0);

        source.failing.store(false, Ordering::SeqCst);
        assert!(repo.list(0, 20).await.is_ok());
        assert_eq!(source.page_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalid_limit_rejected_before_source() {
        let (repo, source, _) = comics_repo();

        let result = repo.list(0, 0).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
        assert_eq!(source.page_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let (repo, source, _) = comics_repo();

        repo.detail(7).await.unwrap();
        assert!(repo.invalidate("comics_detail_7").await);
        assert!(!repo.invalidate("comics_detail_7").await);
        repo.detail(7).await.unwrap();

        assert_eq!(source.detail_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clear_and_sweep() {
        let (repo, _, clock) = comics_repo();

        repo.list(0, 20).await.unwrap();
        repo.detail(1).await.unwrap();

        clock.advance(TtlPolicy::default().list.as_millis() as u64 + 1);
        assert_eq!(repo.sweep_expired().await, 1);
        assert_eq!(repo.stats().await.keys, vec!["comics_detail_1"]);

        repo.clear().await;
        assert_eq!(repo.stats().await.size, 0);
    }

    #[tokio::test]
    async fn test_related_served_from_cache_on_repeat() {
        let (repo, source, _) = comics_repo();
        let relation = Relation::Creator("Stan Lee".to_string());

        let first = repo.related(&relation, 0, 20).await.unwrap();
        let second = repo.related(&relation, 0, 20).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.results[0].title, "Stan Lee");
        assert_eq!(source.page_calls.load(Ordering::SeqCst), 1);
        assert_eq!(repo.stats().await.keys, vec!["comics_by_creator_Stan Lee_0_20"]);
    }

    #[tokio::test]
    async fn test_related_expires_with_list_ttl() {
        let (repo, source, clock) = comics_repo();
        let relation = Relation::Series("X-Men".to_string());

        repo.related(&relation, 0, 20).await.unwrap();
        clock.advance(TtlPolicy::default().list.as_millis() as u64);
        repo.related(&relation, 0, 20).await.unwrap();
        assert_eq!(source.page_calls.load(Ordering::SeqCst), 1);

        clock.advance(1);
        repo.related(&relation, 0, 20).await.unwrap();
        assert_eq!(source.page_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_related_rejects_unsupported_relation() {
        let (repo, source, _) = comics_repo();

        let result = repo.related(&Relation::Comic(5), 0, 20).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));

        let result = repo.related(&Relation::Creator(" ".to_string()), 0, 20).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));

        let result = repo.related(&Relation::Creator("Kirby".to_string()), 0, 0).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));

        assert_eq!(source.page_calls.load(Ordering::SeqCst), 0);
        assert_eq!(repo.stats().await.size, 0);
    }

    #[tokio::test]
    async fn test_related_failure_not_cached() {
        let (repo, source, _) = comics_repo();
        let relation = Relation::Series("X-Men".to_string());
        source.failing.store(true, Ordering::SeqCst);

        let result = repo.related(&relation, 0, 20).await;
        assert!(matches!(result, Err(AppError::Upstream(_))));
        assert_eq!(repo.stats().await.size, 0);
    }

    #[tokio::test]
    async fn test_characters_by_comic_key() {
        let source = Arc::new(FakeSource::default());
        let repo: CatalogRepository<Character, _> = CatalogRepository::new(
            source,
            TtlPolicy::default(),
            crate::cache::DEFAULT_TTL,
        );

        let page = repo.related(&Relation::Comic(82967), 0, 20).await.unwrap();

        assert_eq!(page.results[0].name, "82967");
        assert_eq!(repo.stats().await.keys, vec!["characters_by_comic_82967_0_20"]);
    }

    #[tokio::test]
    async fn test_character_family_keys() {
        let source = Arc::new(FakeSource::default());
        let repo: CatalogRepository<Character, _> = CatalogRepository::new(
            source,
            TtlPolicy::default(),
            crate::cache::DEFAULT_TTL,
        );

        repo.list(0, 20).await.unwrap();
        repo.detail(1009610).await.unwrap();

        assert_eq!(repo.family(), ResourceFamily::Characters);
        assert_eq!(
            repo.stats().await.keys,
            vec!["characters_detail_1009610", "characters_list_0_20"]
        );
    }
}
