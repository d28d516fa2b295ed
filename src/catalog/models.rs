//! Catalog Models
//!
//! Decoded catalog resources as the cache stores them.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

use crate::cache::ResourceFamily;

/// Shown in place of a missing or empty upstream description
pub const NO_DESCRIPTION: &str = "No description available";

fn no_description() -> String {
    NO_DESCRIPTION.to_string()
}

// Upstream sends null, "" or omits the field for undescribed items.
fn description_or_placeholder<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let description = Option::<String>::deserialize(deserializer)?;
    Ok(description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(no_description))
}

// == Resource Trait ==
/// A catalog item type that can be cached and fetched by id.
pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Family the item belongs to, used for cache keys and upstream paths
    const FAMILY: ResourceFamily;

    fn id(&self) -> u64;
}

/// Image reference as `{path}.{extension}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub path: String,
    pub extension: String,
}

impl Thumbnail {
    pub fn url(&self) -> String {
        format!("{}.{}", self.path, self.extension)
    }
}

/// External link attached to a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceUrl {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

/// Sale price of a comic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Price {
    #[serde(rename = "type")]
    pub kind: String,
    pub price: f64,
}

// == Comic ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Comic {
    pub id: u64,
    pub title: String,
    pub issue_number: f64,
    #[serde(default = "no_description", deserialize_with = "description_or_placeholder")]
    pub description: String,
    pub modified: Option<String>,
    pub format: Option<String>,
    pub page_count: u32,
    pub thumbnail: Option<Thumbnail>,
    pub urls: Vec<ResourceUrl>,
    pub prices: Vec<Price>,
}

impl Resource for Comic {
    const FAMILY: ResourceFamily = ResourceFamily::Comics;

    fn id(&self) -> u64 {
        self.id
    }
}

// == Character ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Character {
    pub id: u64,
    pub name: String,
    #[serde(default = "no_description", deserialize_with = "description_or_placeholder")]
    pub description: String,
    pub modified: Option<String>,
    pub thumbnail: Option<Thumbnail>,
    pub urls: Vec<ResourceUrl>,
}

impl Resource for Character {
    const FAMILY: ResourceFamily = ResourceFamily::Characters;

    fn id(&self) -> u64 {
        self.id
    }
}

// == Page ==
/// A window of a paginated collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub count: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}
