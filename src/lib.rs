//! Comicverse Cache - A TTL response cache for a comics catalog
//!
//! Keeps decoded list, search and detail responses of a remote paginated
//! catalog API in memory, each entry with its own expiration deadline.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStats, CacheStore};
pub use client::ApiClient;
pub use config::Config;
pub use error::{AppError, Result};
pub use tasks::spawn_sweep_task;
