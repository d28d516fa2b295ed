//! Catalog Module
//!
//! Comics and characters served through typed, cached repositories.

mod models;
mod repository;
mod source;

pub use models::{Character, Comic, Page, Price, Resource, ResourceUrl, Thumbnail, NO_DESCRIPTION};
pub use repository::CatalogRepository;
pub use source::{CatalogSource, PageQuery, Relation, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
