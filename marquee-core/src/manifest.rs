//! Remote catalog manifest and poster resource paths.
//!
//! The document looks like
//! `{ "page": { "title": .., "content-items": { "content": [ { "name", "poster-image" } ] } } }`.
//! Unknown fields are ignored.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;
use crate::error::ManifestError;

pub const DEFAULT_TITLE: &str = "Catalog";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub page: Page,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "content-items")]
    pub content_items: ContentItems,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContentItems {
    #[serde(default)]
    pub content: Vec<ContentItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub name: String,
    #[serde(rename = "poster-image")]
    pub poster_image: String,
}

impl Manifest {
    pub fn from_json(s: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ManifestError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ManifestError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn title(&self) -> &str {
        self.page
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_TITLE)
    }

    pub fn len(&self) -> usize {
        self.page.content_items.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Catalog entries in document order.
    pub fn into_entries(self) -> Vec<CatalogEntry> {
        self.page
            .content_items
            .content
            .into_iter()
            .map(|c| CatalogEntry::new(c.name, c.poster_image))
            .collect()
    }
}

/// `<asset_root>/images/<poster_path>`, with a single separator at each join.
pub fn poster_url(asset_root: &str, poster_path: &str) -> String {
    format!(
        "{}/images/{}",
        asset_root.trim_end_matches('/'),
        poster_path.trim_start_matches('/')
    )
}
