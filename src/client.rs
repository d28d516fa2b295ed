//! Upstream Catalog Client
//!
//! `CatalogSource` backed by the remote catalog REST API. Responses come
//! wrapped as `{success, message, data: {data: <page>}}`.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::cache::ResourceFamily;
use crate::catalog::{CatalogSource, Page, PageQuery, Relation, Resource};
use crate::config::Config;
use crate::error::{AppError, Result};

// == Wire Envelope ==
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    data: Option<DataWrapper<T>>,
}

#[derive(Debug, Deserialize)]
struct DataWrapper<T> {
    data: T,
}

impl<T> ApiEnvelope<T> {
    fn into_data(self, what: &str) -> Result<T> {
        if !self.success {
            return Err(AppError::Upstream(
                self.message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| format!("Failed to fetch {}", what)),
            ));
        }
        self.data
            .map(|wrapper| wrapper.data)
            .ok_or_else(|| AppError::Decode(format!("{} response carried no data", what)))
    }
}

// == Api Client ==
/// HTTP client for the upstream catalog API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: String,
    /// Bearer token attached to every request when present
    token: Option<String>,
}

impl ApiClient {
    // == Constructor ==
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_base_url.clone(),
            config.api_token.clone(),
            Duration::from_secs(config.api_timeout),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let request = self.http_client.get(format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    // Search goes through a family-specific endpoint and filter parameter.
    fn page_request(&self, family: ResourceFamily, query: &PageQuery) -> RequestBuilder {
        let mut params = vec![
            ("offset", query.offset.to_string()),
            ("limit", query.limit.to_string()),
        ];

        let path = match (family, query.search_term()) {
            (ResourceFamily::Comics, Some(term)) => {
                params.push(("title", term.to_string()));
                "/marvel/comics/search".to_string()
            }
            (ResourceFamily::Characters, Some(term)) => {
                params.push(("nameStartsWith", term.to_string()));
                "/marvel/characters".to_string()
            }
            (family, None) => format!("/marvel/{}", family),
        };

        self.get(&path).query(&params)
    }

    // Characters are nested under the comic or series; comics take a filter.
    fn related_request(
        &self,
        family: ResourceFamily,
        relation: &Relation,
        query: &PageQuery,
    ) -> Result<RequestBuilder> {
        let mut params = vec![
            ("offset", query.offset.to_string()),
            ("limit", query.limit.to_string()),
        ];

        let path = match (family, relation) {
            (ResourceFamily::Characters, Relation::Comic(id)) => {
                format!("/marvel/comics/{}/characters", id)
            }
            (ResourceFamily::Characters, Relation::Series(_)) => {
                format!("/marvel/series/{}/characters", relation.value())
            }
            (ResourceFamily::Comics, Relation::Series(_) | Relation::Creator(_)) => {
                params.push((relation.kind(), relation.value()));
                "/marvel/comics".to_string()
            }
            (family, relation) => {
                return Err(AppError::InvalidRequest(format!(
                    "{} cannot be listed by {}",
                    family,
                    relation.kind()
                )))
            }
        };

        Ok(self.get(&path).query(&params))
    }
}

impl CatalogSource for ApiClient {
    async fn fetch_page<R: Resource>(&self, query: &PageQuery) -> Result<Page<R>> {
        debug!(family = %R::FAMILY, offset = query.offset, limit = query.limit, "fetching page from upstream");

        let response = self
            .page_request(R::FAMILY, query)
            .send()
            .await?
            .error_for_status()?
            .json::<ApiEnvelope<Page<R>>>()
            .await?;

        response.into_data(R::FAMILY.as_str())
    }

    async fn fetch_one<R: Resource>(&self, id: u64) -> Result<Option<R>> {
        debug!(family = %R::FAMILY, id, "fetching item from upstream");

        let response = self
            .get(&format!("/marvel/{}/{}", R::FAMILY, id))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let envelope = response
            .error_for_status()?
            .json::<ApiEnvelope<Page<R>>>()
            .await?;

        if !envelope.success {
            warn!(family = %R::FAMILY, id, reason = ?envelope.message, "upstream reported failure for item");
            return Ok(None);
        }

        let page = envelope.into_data(R::FAMILY.as_str())?;
        Ok(page.results.into_iter().next())
    }

    async fn fetch_related<R: Resource>(&self, relation: &Relation, query: &PageQuery) -> Result<Page<R>> {
        debug!(family = %R::FAMILY, relation = relation.kind(), value = %relation.value(), "fetching related page from upstream");

        let response = self
            .related_request(R::FAMILY, relation, query)?
            .send()
            .await?
            .error_for_status()?
            .json::<ApiEnvelope<Page<R>>>()
            .await?;

        response.into_data(R::FAMILY.as_str())
    }
}
