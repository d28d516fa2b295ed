//! Request DTOs for the catalog service API
//!
//! Defines the query strings accepted by the listing endpoints.

use serde::Deserialize;

use crate::catalog::{PageQuery, DEFAULT_PAGE_LIMIT};

/// Query string for `GET /comics` and `GET /characters`
///
/// # Fields
/// - `offset`: Index of the first item (default 0)
/// - `limit`: Page size (default 20)
/// - `query`: Optional search term; blank means unfiltered
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub query: Option<String>,
}

impl PageParams {
    /// Resolves defaults into the query the repositories understand.
    pub fn into_query(self) -> PageQuery {
        PageQuery {
            query: self.query,
            offset: self.offset.unwrap_or(0),
            limit: self.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        }
    }
}
