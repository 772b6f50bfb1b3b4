//! Upload Draft and Submission Types
//!
//! `UploadDraft` mirrors the contribution form: text fields stay strings
//! (category/subcategory ids included, since that is what form controls
//! bind to) until the workflow assembles a typed submission.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::catalog::ItemKind;
use crate::tag::Tag;

/// A file picked for upload but not yet sent anywhere.
#[derive(Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileHandle")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Mutable form state for a new catalog item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadDraft {
    pub kind: Option<ItemKind>,
    /// Title for articles, name for notebooks.
    pub title: String,
    pub authors: String,
    pub year: Option<i32>,
    pub publisher: String,
    pub abstract_full: String,
    pub abstract_short: String,
    pub url: String,
    /// Form-control bindings keep ids in string form.
    pub category_id: String,
    pub subcategory_id: String,
    pub file: Option<FileHandle>,
    pub selected_tags: Vec<Tag>,
}

impl UploadDraft {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Required fields that are still blank, per item kind.
    ///
    /// An unset kind reports itself as the single missing field.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let Some(kind) = self.kind else {
            return vec!["kind"];
        };

        let mut missing = Vec::new();
        match kind {
            ItemKind::Article => {
                if self.title.trim().is_empty() {
                    missing.push("title");
                }
                if self.year.is_none() {
                    missing.push("year");
                }
                if self.category_id.trim().is_empty() {
                    missing.push("category");
                }
                if self.subcategory_id.trim().is_empty() {
                    missing.push("subcategory");
                }
            }
            ItemKind::Notebook => {
                if self.title.trim().is_empty() {
                    missing.push("name");
                }
                if self.file.is_none() {
                    missing.push("file");
                }
            }
        }
        missing
    }

    /// Back to the pristine form, keeping nothing.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Names of the selected tags, the form the server resolves or creates
    /// tags from.
    pub fn tag_names(&self) -> Vec<String> {
        self.selected_tags.iter().map(|t| t.name.clone()).collect()
    }
}

/// Typed article payload, sent as multipart form data.
#[derive(Debug, Clone, Validate)]
pub struct ArticleSubmission {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    pub authors: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,
    pub publisher: Option<String>,
    pub abstract_full: Option<String>,
    pub abstract_short: Option<String>,
    #[validate(url)]
    pub url: Option<String>,
    pub category_id: i64,
    pub subcategory_id: i64,
    pub tag_names: Vec<String>,
    pub file: Option<FileHandle>,
    /// Travels as a request header, never as form data.
    pub mtrc: String,
}

/// Typed notebook payload, sent as JSON referencing a pre-uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NotebookSubmission {
    #[validate(length(min = 1, max = 300))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<i64>,
    #[serde(rename = "tags")]
    pub tag_names: Vec<String>,
    pub file_path: String,
    /// Travels as a request header, never in the JSON body.
    #[serde(skip)]
    pub mtrc: String,
}
