//! Shared in-memory double of the portal API.
//!
//! Responses can be scripted per items() call (delay + result) to exercise
//! degradation paths and overlapping-fetch ordering; call counters let
//! tests assert what never hit the network.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use docent_catalog::CatalogApi;
use docent_models::{
    ArticleSubmission, CatalogItem, Category, FileHandle, ItemFilter, ItemKind,
    NotebookSubmission, Subcategory, Tag,
};
use docent_utils::{DocentError, DocentResult};

pub struct ScriptedItems {
    pub delay: Duration,
    pub result: DocentResult<Vec<CatalogItem>>,
}

pub struct MockCatalogApi {
    pub categories: Vec<Category>,
    pub subcategories: Vec<Subcategory>,
    pub tags: Vec<Tag>,
    pub default_items: Vec<CatalogItem>,
    pub fail_lookups: bool,
    pub scripted_items: Mutex<VecDeque<ScriptedItems>>,
    pub create_error: Mutex<Option<DocentError>>,
    pub create_delay: Duration,
    pub analyze_payload: Mutex<Option<Value>>,
    pub network_calls: AtomicUsize,
    pub items_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub last_filter: Mutex<Option<ItemFilter>>,
    pub last_notebook: Mutex<Option<NotebookSubmission>>,
}

impl MockCatalogApi {
    pub fn new() -> Self {
        Self {
            categories: vec![
                Category {
                    id: 1,
                    name: "Classification".to_string(),
                },
                Category {
                    id: 2,
                    name: "Generation".to_string(),
                },
            ],
            subcategories: vec![
                Subcategory {
                    id: 10,
                    name: "Image".to_string(),
                    parent_category_id: 1,
                },
                Subcategory {
                    id: 11,
                    name: "Text".to_string(),
                    parent_category_id: 1,
                },
                Subcategory {
                    id: 20,
                    name: "Diffusion".to_string(),
                    parent_category_id: 2,
                },
            ],
            tags: vec![
                Tag::persisted(1, "nlp"),
                Tag::persisted(2, "vision"),
                Tag::persisted(3, "diffusion"),
            ],
            default_items: vec![sample_item(1, "My Paper"), sample_item(2, "Benchmarks")],
            fail_lookups: false,
            scripted_items: Mutex::new(VecDeque::new()),
            create_error: Mutex::new(None),
            create_delay: Duration::ZERO,
            analyze_payload: Mutex::new(None),
            network_calls: AtomicUsize::new(0),
            items_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            last_filter: Mutex::new(None),
            last_notebook: Mutex::new(None),
        }
    }

    pub fn script_items(&self, delay_ms: u64, result: DocentResult<Vec<CatalogItem>>) {
        self.scripted_items.lock().unwrap().push_back(ScriptedItems {
            delay: Duration::from_millis(delay_ms),
            result,
        });
    }

    fn count_network_call(&self) {
        self.network_calls.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn sample_item(id: i64, title: &str) -> CatalogItem {
    CatalogItem {
        id,
        title: title.to_string(),
        authors: None,
        year: Some(2023),
        publisher: None,
        abstract_full: None,
        abstract_short: None,
        url: None,
        file_path: None,
        category_id: 1,
        subcategory_id: Some(10),
        tags: Vec::new(),
        created_at: chrono::Utc::now(),
        created_by: "E0001".to_string(),
    }
}

pub fn sample_file(name: &str) -> FileHandle {
    FileHandle {
        file_name: name.to_string(),
        content_type: "application/octet-stream".to_string(),
        bytes: b"content".to_vec(),
    }
}

#[async_trait]
impl CatalogApi for MockCatalogApi {
    async fn categories(&self) -> DocentResult<Vec<Category>> {
        self.count_network_call();
        if self.fail_lookups {
            return Err(DocentError::network("categories unavailable"));
        }
        Ok(self.categories.clone())
    }

    async fn subcategories(&self) -> DocentResult<Vec<Subcategory>> {
        self.count_network_call();
        if self.fail_lookups {
            return Err(DocentError::network("subcategories unavailable"));
        }
        Ok(self.subcategories.clone())
    }

    async fn tags(&self) -> DocentResult<Vec<Tag>> {
        self.count_network_call();
        if self.fail_lookups {
            return Err(DocentError::network("tags unavailable"));
        }
        Ok(self.tags.clone())
    }

    async fn items(&self, _kind: ItemKind, filter: &ItemFilter) -> DocentResult<Vec<CatalogItem>> {
        self.count_network_call();
        self.items_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_filter.lock().unwrap() = Some(filter.clone());

        let scripted = self.scripted_items.lock().unwrap().pop_front();
        match scripted {
            Some(script) => {
                tokio::time::sleep(script.delay).await;
                script.result
            }
            None => Ok(self.default_items.clone()),
        }
    }

    async fn create_article(&self, submission: &ArticleSubmission) -> DocentResult<CatalogItem> {
        self.count_network_call();
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.create_delay).await;

        let scripted_error = self.create_error.lock().unwrap().take();
        if let Some(error) = scripted_error {
            return Err(error);
        }

        let mut item = sample_item(999, &submission.title);
        item.year = Some(submission.year);
        item.category_id = submission.category_id;
        item.subcategory_id = Some(submission.subcategory_id);
        item.created_by = submission.mtrc.clone();
        Ok(item)
    }

    async fn create_notebook(&self, submission: &NotebookSubmission) -> DocentResult<CatalogItem> {
        self.count_network_call();
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.create_delay).await;

        let scripted_error = self.create_error.lock().unwrap().take();
        if let Some(error) = scripted_error {
            return Err(error);
        }

        *self.last_notebook.lock().unwrap() = Some(submission.clone());
        let mut item = sample_item(998, &submission.name);
        item.file_path = Some(submission.file_path.clone());
        item.created_by = submission.mtrc.clone();
        Ok(item)
    }

    async fn download(&self, _kind: ItemKind, _id: i64) -> DocentResult<Vec<u8>> {
        self.count_network_call();
        Ok(b"file-bytes".to_vec())
    }

    async fn analyze_document(&self, _file: &FileHandle) -> DocentResult<Value> {
        self.count_network_call();
        let payload = self.analyze_payload.lock().unwrap().clone();
        Ok(payload.unwrap_or_else(|| serde_json::json!({})))
    }
}
