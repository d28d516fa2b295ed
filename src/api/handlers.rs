//! API Handlers
//!
//! HTTP request handlers for the catalog and cache diagnostic endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::cache::{Clock, SystemClock, TtlPolicy};
use crate::catalog::{CatalogRepository, CatalogSource, Character, Comic, Page, Relation, Resource};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    CacheStatsResponse, HealthResponse, InvalidateResponse, MaintenanceResponse, PageParams,
};

/// Application state shared across all handlers.
///
/// One cached repository per resource family, all backed by the same source.
pub struct AppState<S, C = SystemClock> {
    pub comics: Arc<CatalogRepository<Comic, S, C>>,
    pub characters: Arc<CatalogRepository<Character, S, C>>,
}

impl<S, C> Clone for AppState<S, C> {
    fn clone(&self) -> Self {
        Self {
            comics: self.comics.clone(),
            characters: self.characters.clone(),
        }
    }
}

impl<S: CatalogSource> AppState<S> {
    /// Creates repositories for every family over `source`.
    pub fn new(source: Arc<S>, ttl: TtlPolicy, default_ttl: Duration) -> Self {
        Self::with_clock(source, ttl, default_ttl, SystemClock)
    }

    /// Creates the state with the TTLs from the Config.
    pub fn from_config(config: &Config, source: S) -> Self {
        Self::new(Arc::new(source), config.ttl_policy(), config.default_ttl())
    }
}

impl<S, C> AppState<S, C>
where
    S: CatalogSource,
    C: Clock + Clone + Send + Sync + 'static,
{
    /// Creates repositories whose stores all read time from `clock`.
    pub fn with_clock(source: Arc<S>, ttl: TtlPolicy, default_ttl: Duration, clock: C) -> Self {
        Self {
            comics: Arc::new(CatalogRepository::with_clock(
                source.clone(),
                ttl,
                default_ttl,
                clock.clone(),
            )),
            characters: Arc::new(CatalogRepository::with_clock(source, ttl, default_ttl, clock)),
        }
    }

    /// Empties every store. Returns the number of entries dropped.
    pub async fn clear_all(&self) -> usize {
        let removed = self.comics.stats().await.size + self.characters.stats().await.size;
        self.comics.clear().await;
        self.characters.clear().await;
        removed
    }

    /// Sweeps every store. Returns the number of expired entries removed.
    pub async fn sweep_all(&self) -> usize {
        self.comics.sweep_expired().await + self.characters.sweep_expired().await
    }

    /// Drops `key` wherever it is cached.
    pub async fn invalidate(&self, key: &str) -> bool {
        let from_comics = self.comics.invalidate(key).await;
        let from_characters = self.characters.invalidate(key).await;
        from_comics || from_characters
    }

    pub async fn stats(&self) -> CacheStatsResponse {
        CacheStatsResponse::new(self.comics.stats().await, self.characters.stats().await)
    }
}

async fn page_of<R: Resource, S: CatalogSource>(
    repo: &CatalogRepository<R, S>,
    params: PageParams,
) -> Result<Json<Page<R>>> {
    let page = repo.page(params.into_query()).await?;
    Ok(Json(page))
}

async fn related_of<R: Resource, S: CatalogSource>(
    repo: &CatalogRepository<R, S>,
    relation: Relation,
    params: PageParams,
) -> Result<Json<Page<R>>> {
    let query = params.into_query();
    let page = repo.related(&relation, query.offset, query.limit).await?;
    Ok(Json(page))
}

async fn detail_of<R: Resource, S: CatalogSource>(
    repo: &CatalogRepository<R, S>,
    id: u64,
) -> Result<Json<R>> {
    repo.detail(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("{} {} not found", R::FAMILY, id)))
}

/// Handler for GET /comics
pub async fn list_comics<S: CatalogSource>(
    State(state): State<AppState<S>>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Comic>>> {
    page_of(&*state.comics, params).await
}

/// Handler for GET /comics/:id
pub async fn comic_detail<S: CatalogSource>(
    State(state): State<AppState<S>>,
    Path(id): Path<u64>,
) -> Result<Json<Comic>> {
    detail_of(&*state.comics, id).await
}

/// Handler for GET /characters
pub async fn list_characters<S: CatalogSource>(
    State(state): State<AppState<S>>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Character>>> {
    page_of(&*state.characters, params).await
}

/// Handler for GET /characters/:id
pub async fn character_detail<S: CatalogSource>(
    State(state): State<AppState<S>>,
    Path(id): Path<u64>,
) -> Result<Json<Character>> {
    detail_of(&*state.characters, id).await
}

/// Handler for GET /comics/:id/characters
pub async fn comic_characters<S: CatalogSource>(
    State(state): State<AppState<S>>,
    Path(id): Path<u64>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Character>>> {
    related_of(&*state.characters, Relation::Comic(id), params).await
}

/// Handler for GET /series/:series/characters
pub async fn series_characters<S: CatalogSource>(
    State(state): State<AppState<S>>,
    Path(series): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Character>>> {
    related_of(&*state.characters, Relation::Series(series), params).await
}

/// Handler for GET /series/:series/comics
pub async fn series_comics<S: CatalogSource>(
    State(state): State<AppState<S>>,
    Path(series): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Comic>>> {
    related_of(&*state.comics, Relation::Series(series), params).await
}

/// Handler for GET /creators/:creator/comics
pub async fn creator_comics<S: CatalogSource>(
    State(state): State<AppState<S>>,
    Path(creator): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Comic>>> {
    related_of(&*state.comics, Relation::Creator(creator), params).await
}

/// Handler for GET /cache/stats
pub async fn stats_handler<S: CatalogSource>(
    State(state): State<AppState<S>>,
) -> Json<CacheStatsResponse> {
    Json(state.stats().await)
}

/// Handler for DELETE /cache/:key
///
/// Deleting a key that is not cached is not an error.
pub async fn invalidate_handler<S: CatalogSource>(
    State(state): State<AppState<S>>,
    Path(key): Path<String>,
) -> Json<InvalidateResponse> {
    let removed = state.invalidate(&key).await;
    Json(InvalidateResponse::new(key, removed))
}

/// Handler for POST /cache/clear
pub async fn clear_handler<S: CatalogSource>(
    State(state): State<AppState<S>>,
) -> Json<MaintenanceResponse> {
    let removed = state.clear_all().await;
    info!("Cache cleared on request: {} entries dropped", removed);
    Json(MaintenanceResponse::cleared(removed))
}

/// Handler for POST /cache/sweep
pub async fn sweep_handler<S: CatalogSource>(
    State(state): State<AppState<S>>,
) -> Json<MaintenanceResponse> {
    let removed = state.sweep_all().await;
    Json(MaintenanceResponse::swept(removed))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::PageQuery;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Source returning one fabricated item per request.
    #[derive(Default)]
    pub(crate) struct StubSource {
        pub(crate) calls: AtomicUsize,
    }

    impl CatalogSource for StubSource {
        async fn fetch_page<R: Resource>(&self, query: &PageQuery) -> Result<Page<R>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            serde_json::from_value(json!({
                "offset": query.offset,
                "limit": query.limit,
                "total": 1,
                "count": 1,
                "results": [{ "id": 1, "title": "Hulk", "name": "Hulk" }]
            }))
            .map_err(|e| AppError::Decode(e.to_string()))
        }

        async fn fetch_one<R: Resource>(&self, id: u64) -> Result<Option<R>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if id == 0 {
                return Ok(None);
            }
            serde_json::from_value(json!({ "id": id, "title": "Hulk", "name": "Hulk" }))
                .map(Some)
                .map_err(|e| AppError::Decode(e.to_string()))
        }

        async fn fetch_related<R: Resource>(
            &self,
            relation: &Relation,
            query: &PageQuery,
        ) -> Result<Page<R>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            serde_json::from_value(json!({
                "offset": query.offset,
                "limit": query.limit,
                "total": 1,
                "count": 1,
                "results": [{ "id": 2, "title": relation.value(), "name": relation.value() }]
            }))
            .map_err(|e| AppError::Decode(e.to_string()))
        }
    }

    pub(crate) fn test_state() -> AppState<StubSource> {
        AppState::from_config(&Config::default(), StubSource::default())
    }

    #[tokio::test]
    async fn test_list_and_stats_handlers() {
        let state = test_state();

        let page = list_comics(State(state.clone()), Query(PageParams::default()))
            .await
            .unwrap();
        assert_eq!(page.results[0].title, "Hulk");

        let stats = stats_handler(State(state)).await;
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.comics.keys, vec!["comics_list_0_20"]);
        assert!(stats.characters.keys.is_empty());
    }

    #[tokio::test]
    async fn test_detail_handler_not_found() {
        let state = test_state();

        let result = character_detail(State(state), Path(0)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_detail_handler_served_once_from_source() {
        let source = Arc::new(StubSource::default());
        let state = AppState::new(source.clone(), TtlPolicy::default(), crate::cache::DEFAULT_TTL);

        let _first = comic_detail(State(state.clone()), Path(5)).await.unwrap();
        let comic = comic_detail(State(state.clone()), Path(5)).await.unwrap();

        assert_eq!(comic.id, 5);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.comics.stats().await.hits, 1);
    }

    #[tokio::test]
    async fn test_invalidate_handler() {
        let state = test_state();
        let _page = list_characters(State(state.clone()), Query(PageParams::default()))
            .await
            .unwrap();

        let resp = invalidate_handler(State(state.clone()), Path("characters_list_0_20".to_string())).await;
        assert!(resp.removed);

        let resp = invalidate_handler(State(state), Path("characters_list_0_20".to_string())).await;
        assert!(!resp.removed);
    }

    #[tokio::test]
    async fn test_clear_and_sweep_handlers() {
        let state = test_state();
        let _page = list_comics(State(state.clone()), Query(PageParams::default()))
            .await
            .unwrap();
        let _character = character_detail(State(state.clone()), Path(3)).await.unwrap();

        let swept = sweep_handler(State(state.clone())).await;
        assert_eq!(swept.removed, 0);

        let cleared = clear_handler(State(state.clone())).await;
        assert_eq!(cleared.removed, 2);
        assert_eq!(state.stats().await.total_entries, 0);
    }

    #[tokio::test]
    async fn test_related_handlers_cache_per_relation() {
        let source = Arc::new(StubSource::default());
        let state = AppState::new(source.clone(), TtlPolicy::default(), crate::cache::DEFAULT_TTL);

        let params = || Query(PageParams::default());

        let page = comic_characters(State(state.clone()), Path(82967), params())
            .await
            .unwrap();
        assert_eq!(page.results[0].name, "82967");

        let _again = comic_characters(State(state.clone()), Path(82967), params())
            .await
            .unwrap();
        let _series = series_comics(State(state.clone()), Path("X-Men".to_string()), params())
            .await
            .unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        let stats = state.stats().await;
        assert_eq!(stats.characters.keys, vec!["characters_by_comic_82967_0_20"]);
        assert_eq!(stats.comics.keys, vec!["comics_by_series_X-Men_0_20"]);
    }

    #[tokio::test]
    async fn test_related_handler_blank_value_rejected() {
        let state = test_state();

        let result =
            creator_comics(State(state), Path(" ".to_string()), Query(PageParams::default())).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
