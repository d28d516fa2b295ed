//! API Module
//!
//! HTTP handlers and routing for the catalog service.
//!
//! # Endpoints
//! - `GET /comics`, `GET /comics/:id` - Cached comics
//! - `GET /characters`, `GET /characters/:id` - Cached characters
//! - `GET /cache/stats` - Cache snapshot
//! - `DELETE /cache/:key` - Invalidate a key
//! - `POST /cache/clear`, `POST /cache/sweep` - Cache maintenance
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
