//! Catalog Listing Types
//!
//! Read-only wire models for the browsable catalog: items, categories and
//! the filter parameters the item endpoints accept.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tag::Tag;

/// The two item kinds the catalog lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Article,
    Notebook,
}

impl ItemKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "article" => Some(Self::Article),
            "notebook" => Some(Self::Notebook),
            _ => None,
        }
    }

    /// Field label shown when the title/name is missing on a draft.
    pub fn title_field(&self) -> &'static str {
        match self {
            Self::Article => "title",
            Self::Notebook => "name",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Article => write!(f, "article"),
            Self::Notebook => write!(f, "notebook"),
        }
    }
}

/// A model category (top level of the browse hierarchy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A subcategory, attached to its parent category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: i64,
    pub name: String,
    pub parent_category_id: i64,
}

/// A listed catalog item (article or notebook).
///
/// Immutable once listed; the engine only ever replaces its cached copy by
/// re-fetching the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: i64,
    /// Articles carry `title` on the wire, notebooks `name`.
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_full: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    pub category_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<i64>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: String,
}

impl CatalogItem {
    /// Case-insensitive title/name equality, used by the duplicate pre-check.
    pub fn title_matches(&self, candidate: &str) -> bool {
        self.title.to_lowercase() == candidate.to_lowercase()
    }
}

/// Query parameters the item list endpoints accept.
///
/// The API honors a single tag; the engine forwards only the first selected
/// one. That is the upstream contract, not a client shortcut.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub tag: Option<String>,
}

impl ItemFilter {
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none() && self.subcategory_id.is_none() && self.tag.is_none()
    }
}
