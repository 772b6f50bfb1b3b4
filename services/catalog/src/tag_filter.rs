//! Tag Filter Subsystem
//!
//! The selected-tag set behind both the list filter bar and the upload
//! form's tag picker. The set never holds two tags with the same id, and
//! suggestions never offer a tag that is already selected.

use docent_models::{Tag, TagId, MAX_SELECTED_TAGS, MAX_TAG_SUGGESTIONS};
use docent_utils::{DocentError, DocentResult};

/// Insertion-ordered set of selected tags, unique by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagFilter {
    selected: Vec<Tag>,
}

impl TagFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Up to [`MAX_TAG_SUGGESTIONS`] vocabulary tags whose name contains
    /// `query` case-insensitively, skipping already-selected tags. A blank
    /// query suggests nothing.
    pub fn suggest(&self, vocabulary: &[Tag], query: &str) -> Vec<Tag> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        vocabulary
            .iter()
            .filter(|tag| tag.name.to_lowercase().contains(&query))
            .filter(|tag| !self.contains(&tag.id))
            .take(MAX_TAG_SUGGESTIONS)
            .cloned()
            .collect()
    }

    /// Append `tag` unless its id is already selected. Returns whether the
    /// set changed.
    pub fn add(&mut self, tag: Tag) -> bool {
        if self.contains(&tag.id) {
            return false;
        }
        self.selected.push(tag);
        true
    }

    /// Drop the tag with `id`. Returns whether the set changed.
    pub fn remove(&mut self, id: &TagId) -> bool {
        let before = self.selected.len();
        self.selected.retain(|tag| tag.id != *id);
        self.selected.len() != before
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn contains(&self, id: &TagId) -> bool {
        self.selected.iter().any(|tag| tag.id == *id)
    }

    pub fn selected(&self) -> &[Tag] {
        &self.selected
    }

    /// The first selected tag, the only one the item API honors.
    pub fn primary(&self) -> Option<&Tag> {
        self.selected.first()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// The upload form's tag picker: the same set primitives with a hard
/// cardinality cap. Adding beyond the cap is rejected with a user-facing
/// message, never silently truncated.
#[derive(Debug, Clone, PartialEq)]
pub struct TagSelector {
    filter: TagFilter,
    limit: usize,
}

impl TagSelector {
    pub fn new() -> Self {
        Self::with_limit(MAX_SELECTED_TAGS)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            filter: TagFilter::new(),
            limit,
        }
    }

    pub fn suggest(&self, vocabulary: &[Tag], query: &str) -> Vec<Tag> {
        self.filter.suggest(vocabulary, query)
    }

    /// Duplicate ids are a no-op; a tag past the cap is an error.
    pub fn add(&mut self, tag: Tag) -> DocentResult<()> {
        if self.filter.contains(&tag.id) {
            return Ok(());
        }
        if self.filter.len() >= self.limit {
            return Err(DocentError::validation(
                "tags",
                format!("At most {} tags can be selected", self.limit),
            ));
        }
        self.filter.add(tag);
        Ok(())
    }

    pub fn remove(&mut self, id: &TagId) -> bool {
        self.filter.remove(id)
    }

    pub fn clear(&mut self) {
        self.filter.clear();
    }

    /// Replace the selection wholesale (metadata pre-fill), truncating to
    /// the cap.
    pub fn replace(&mut self, tags: Vec<Tag>) {
        self.filter.clear();
        for tag in tags.into_iter().take(self.limit) {
            self.filter.add(tag);
        }
    }

    pub fn selected(&self) -> &[Tag] {
        self.filter.selected()
    }
}

impl Default for TagSelector {
    fn default() -> Self {
        Self::new()
    }
}
