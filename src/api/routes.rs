//! API Routes
//!
//! Configures the Axum router with the catalog and cache endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    character_detail, clear_handler, comic_characters, comic_detail, creator_comics,
    health_handler, invalidate_handler, list_characters, list_comics, series_characters,
    series_comics, stats_handler, sweep_handler, AppState,
};
use crate::catalog::CatalogSource;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /comics` - Cached comics list or search (`offset`, `limit`, `query`)
/// - `GET /comics/:id` - Cached comic detail
/// - `GET /characters` - Cached characters list or search
/// - `GET /characters/:id` - Cached character detail
/// - `GET /comics/:id/characters` - Cached characters appearing in a comic
/// - `GET /series/:series/characters` - Cached characters of a series
/// - `GET /series/:series/comics` - Cached comics of a series
/// - `GET /creators/:creator/comics` - Cached comics credited to a creator
/// - `GET /cache/stats` - Cache snapshot per family
/// - `DELETE /cache/:key` - Invalidate a key
/// - `POST /cache/clear` - Empty every store
/// - `POST /cache/sweep` - Remove expired entries
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin, the catalog is read by a browser front-end
/// - Tracing: Logs all requests for debugging
pub fn create_router<S: CatalogSource>(state: AppState<S>) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/comics", get(list_comics::<S>))
        .route("/comics/:id", get(comic_detail::<S>))
        .route("/characters", get(list_characters::<S>))
        .route("/characters/:id", get(character_detail::<S>))
        .route("/comics/:id/characters", get(comic_characters::<S>))
        .route("/series/:series/characters", get(series_characters::<S>))
        .route("/series/:series/comics", get(series_comics::<S>))
        .route("/creators/:creator/comics", get(creator_comics::<S>))
        .route("/cache/stats", get(stats_handler::<S>))
        .route("/cache/clear", post(clear_handler::<S>))
        .route("/cache/sweep", post(sweep_handler::<S>))
        .route("/cache/:key", delete(invalidate_handler::<S>))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
