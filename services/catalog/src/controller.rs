//! Catalog Controller
//!
//! Orchestrates the catalog view: one concurrent initial load of the four
//! lookups, filter-driven item refetches, and the derived pagination state.
//! Lookup failures degrade to empty lists; only an item-list failure is
//! surfaced to the user.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use docent_models::{CatalogItem, Category, ItemFilter, ItemKind, Subcategory, Tag, TagId};
use docent_utils::{CatalogConfig, DocentError, DocentResult};

use crate::api_client::CatalogApi;
use crate::pagination::{paginate, PageState};
use crate::tag_filter::TagFilter;

/// Everything a catalog view binds to.
#[derive(Debug, Clone)]
pub struct CatalogState {
    pub categories: Vec<Category>,
    pub subcategories: Vec<Subcategory>,
    /// The full known tag vocabulary, for suggestions and reconciliation.
    pub vocabulary: Vec<Tag>,
    pub items: Vec<CatalogItem>,
    pub filter_tags: TagFilter,
    pub category_filter: Option<i64>,
    pub subcategory_filter: Option<i64>,
    pub page: PageState,
    pub loading: bool,
    pub error: Option<DocentError>,
}

impl CatalogState {
    fn new(page_size: usize) -> Self {
        Self {
            categories: Vec::new(),
            subcategories: Vec::new(),
            vocabulary: Vec::new(),
            items: Vec::new(),
            filter_tags: TagFilter::new(),
            category_filter: None,
            subcategory_filter: None,
            page: PageState::new(page_size),
            loading: false,
            error: None,
        }
    }

    /// The wire filter for the item endpoints. Only the first selected tag
    /// travels; the API contract honors no more.
    fn item_filter(&self) -> ItemFilter {
        ItemFilter {
            category_id: self.category_filter,
            subcategory_id: self.subcategory_filter,
            tag: self.filter_tags.primary().map(|tag| tag.id.to_string()),
        }
    }
}

/// Drives one item list (articles or notebooks).
pub struct CatalogController {
    api: Arc<dyn CatalogApi>,
    kind: ItemKind,
    state: Arc<RwLock<CatalogState>>,
    /// Monotonic fetch generation. A response is applied only while it is
    /// still the latest issued fetch, so a slow stale response can never
    /// overwrite a newer one.
    generation: AtomicU64,
    page_window: usize,
}

impl CatalogController {
    pub fn new(api: Arc<dyn CatalogApi>, kind: ItemKind, config: &CatalogConfig) -> Self {
        Self {
            api,
            kind,
            state: Arc::new(RwLock::new(CatalogState::new(config.page_size))),
            generation: AtomicU64::new(0),
            page_window: config.page_window,
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Fetch categories, subcategories, tags and items concurrently.
    ///
    /// Each lookup failure falls back to an empty list and a warning; an
    /// item failure empties the list and surfaces the error.
    pub async fn load_initial(&self) {
        let filter = {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
            state.item_filter()
        };
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let (categories, subcategories, tags, items) = tokio::join!(
            self.api.categories(),
            self.api.subcategories(),
            self.api.tags(),
            self.api.items(self.kind, &filter),
        );

        let mut state = self.state.write().await;
        if generation != self.generation.load(Ordering::SeqCst) {
            tracing::debug!(generation, "dropping stale initial load");
            return;
        }

        state.categories = categories.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "categories lookup failed, continuing with none");
            Vec::new()
        });
        state.subcategories = subcategories.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "subcategories lookup failed, continuing with none");
            Vec::new()
        });
        state.vocabulary = tags.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "tags lookup failed, continuing with none");
            Vec::new()
        });
        Self::apply_items(&mut state, items);
        state.loading = false;
    }

    /// Re-issue the item query for the current filters and reset to page 1.
    pub async fn refetch_items(&self) {
        let filter = {
            let mut state = self.state.write().await;
            state.loading = true;
            state.item_filter()
        };
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let items = self.api.items(self.kind, &filter).await;

        let mut state = self.state.write().await;
        if generation != self.generation.load(Ordering::SeqCst) {
            tracing::debug!(generation, "dropping stale item response");
            return;
        }
        Self::apply_items(&mut state, items);
        state.loading = false;
    }

    fn apply_items(state: &mut CatalogState, items: DocentResult<Vec<CatalogItem>>) {
        match items {
            Ok(items) => {
                state.page.set_total_items(items.len());
                state.page.reset();
                state.items = items;
                state.error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "item list fetch failed");
                state.items.clear();
                state.page.set_total_items(0);
                state.page.reset();
                state.error = Some(e);
            }
        }
    }

    // ---- filter mutators, each of which refetches ----

    pub async fn set_category_filter(&self, category_id: Option<i64>) {
        {
            let mut state = self.state.write().await;
            state.category_filter = category_id;
            // a subcategory outside the newly selected category is stale
            match category_id {
                Some(category_id) => {
                    if let Some(subcategory_id) = state.subcategory_filter {
                        let still_valid = state.subcategories.iter().any(|s| {
                            s.id == subcategory_id && s.parent_category_id == category_id
                        });
                        if !still_valid {
                            state.subcategory_filter = None;
                        }
                    }
                }
                None => state.subcategory_filter = None,
            }
        }
        self.refetch_items().await;
    }

    pub async fn set_subcategory_filter(&self, subcategory_id: Option<i64>) {
        self.state.write().await.subcategory_filter = subcategory_id;
        self.refetch_items().await;
    }

    pub async fn add_filter_tag(&self, tag: Tag) {
        let changed = self.state.write().await.filter_tags.add(tag);
        if changed {
            self.refetch_items().await;
        }
    }

    pub async fn remove_filter_tag(&self, id: &TagId) {
        let changed = self.state.write().await.filter_tags.remove(id);
        if changed {
            self.refetch_items().await;
        }
    }

    pub async fn clear_filter_tags(&self) {
        let changed = {
            let mut state = self.state.write().await;
            let had_any = !state.filter_tags.is_empty();
            state.filter_tags.clear();
            had_any
        };
        if changed {
            self.refetch_items().await;
        }
    }

    /// Vocabulary tags matching `query`, minus the already-selected ones.
    pub async fn suggest_filter_tags(&self, query: &str) -> Vec<Tag> {
        let state = self.state.read().await;
        state.filter_tags.suggest(&state.vocabulary, query)
    }

    // ---- pagination, purely client-side ----

    pub async fn next_page(&self) {
        self.state.write().await.page.next_page();
    }

    pub async fn prev_page(&self) {
        self.state.write().await.page.prev_page();
    }

    pub async fn goto_page(&self, page: usize) {
        self.state.write().await.page.goto(page);
    }

    /// The items of the current page.
    pub async fn current_page_items(&self) -> Vec<CatalogItem> {
        let state = self.state.read().await;
        paginate(&state.items, state.page.current_page, state.page.page_size).to_vec()
    }

    /// The page-number buttons to render.
    pub async fn page_window(&self) -> Vec<usize> {
        let state = self.state.read().await;
        state.page.window(self.page_window)
    }

    // ---- accessors ----

    pub async fn state(&self) -> CatalogState {
        self.state.read().await.clone()
    }

    pub async fn vocabulary(&self) -> Vec<Tag> {
        self.state.read().await.vocabulary.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn error(&self) -> Option<DocentError> {
        self.state.read().await.error.clone()
    }

    /// Subcategories belonging to the selected category; all of them when
    /// no category is selected.
    pub async fn subcategories_for_selected(&self) -> Vec<Subcategory> {
        let state = self.state.read().await;
        match state.category_filter {
            Some(category_id) => state
                .subcategories
                .iter()
                .filter(|s| s.parent_category_id == category_id)
                .cloned()
                .collect(),
            None => state.subcategories.clone(),
        }
    }

    /// Fetch an item's file for the download button.
    pub async fn download(&self, id: i64) -> DocentResult<Vec<u8>> {
        self.api.download(self.kind, id).await
    }
}
