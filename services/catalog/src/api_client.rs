//! Portal API Client
//!
//! Thin typed wrapper over the catalog REST endpoints. The trait is the
//! seam the controller and upload workflow are injected through, so tests
//! run against an in-memory double instead of a live portal.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use docent_models::{
    ArticleSubmission, CatalogItem, Category, FileHandle, ItemFilter, ItemKind,
    NotebookSubmission, Subcategory, Tag,
};
use docent_utils::{ApiConfig, DocentError, DocentResult};

/// Catalog API operations the engine consumes.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn categories(&self) -> DocentResult<Vec<Category>>;
    async fn subcategories(&self) -> DocentResult<Vec<Subcategory>>;
    async fn tags(&self) -> DocentResult<Vec<Tag>>;
    async fn items(&self, kind: ItemKind, filter: &ItemFilter) -> DocentResult<Vec<CatalogItem>>;
    async fn create_article(&self, submission: &ArticleSubmission) -> DocentResult<CatalogItem>;
    async fn create_notebook(&self, submission: &NotebookSubmission) -> DocentResult<CatalogItem>;
    async fn download(&self, kind: ItemKind, id: i64) -> DocentResult<Vec<u8>>;
    async fn analyze_document(&self, file: &FileHandle) -> DocentResult<Value>;
}

/// HTTP implementation against the portal backend.
pub struct HttpCatalogApi {
    client: Client,
    base_url: String,
    employee_header: String,
}

impl HttpCatalogApi {
    pub fn new(config: &ApiConfig) -> DocentResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| DocentError::configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            employee_header: config.employee_header.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn items_path(kind: ItemKind) -> &'static str {
        match kind {
            ItemKind::Article => "articles",
            ItemKind::Notebook => "notebooks",
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> DocentResult<T> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await?;
        let response = Self::check(response).await?;
        response.json().await.map_err(Into::into)
    }

    /// Non-2xx responses become `Network` errors carrying the body, so
    /// server messages (duplicate-key wording included) survive intact.
    async fn check(response: reqwest::Response) -> DocentResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(DocentError::network(format!("{}: {}", status, body)))
    }

    fn file_part(file: &FileHandle) -> DocentResult<Part> {
        Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| DocentError::internal(format!("file part: {}", e)))
    }

    fn article_form(submission: &ArticleSubmission) -> DocentResult<Form> {
        let mut form = Form::new()
            .text("title", submission.title.clone())
            .text("year", submission.year.to_string())
            .text("categoryId", submission.category_id.to_string())
            .text("subcategoryId", submission.subcategory_id.to_string());

        // optional scalars travel only when present
        if let Some(authors) = &submission.authors {
            form = form.text("authors", authors.clone());
        }
        if let Some(publisher) = &submission.publisher {
            form = form.text("publisher", publisher.clone());
        }
        if let Some(abstract_full) = &submission.abstract_full {
            form = form.text("abstractFull", abstract_full.clone());
        }
        if let Some(abstract_short) = &submission.abstract_short {
            form = form.text("abstractShort", abstract_short.clone());
        }
        if let Some(url) = &submission.url {
            form = form.text("url", url.clone());
        }

        // the server resolves or creates tags by name
        form = form.text("tags", serde_json::to_string(&submission.tag_names)?);

        if let Some(file) = &submission.file {
            form = form.part("file", Self::file_part(file)?);
        }
        Ok(form)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn categories(&self) -> DocentResult<Vec<Category>> {
        self.get_json("categories", &[]).await
    }

    async fn subcategories(&self) -> DocentResult<Vec<Subcategory>> {
        self.get_json("subcategories", &[]).await
    }

    async fn tags(&self) -> DocentResult<Vec<Tag>> {
        self.get_json("tags", &[]).await
    }

    async fn items(&self, kind: ItemKind, filter: &ItemFilter) -> DocentResult<Vec<CatalogItem>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(category_id) = filter.category_id {
            query.push(("category_id", category_id.to_string()));
        }
        if let Some(subcategory_id) = filter.subcategory_id {
            query.push(("subcategory_id", subcategory_id.to_string()));
        }
        if let Some(tag) = &filter.tag {
            query.push(("tag", tag.clone()));
        }
        self.get_json(Self::items_path(kind), &query).await
    }

    async fn create_article(&self, submission: &ArticleSubmission) -> DocentResult<CatalogItem> {
        let response = self
            .client
            .post(self.url("articles"))
            .header(&self.employee_header, &submission.mtrc)
            .multipart(Self::article_form(submission)?)
            .send()
            .await?;
        let response = Self::check(response).await?;
        response.json().await.map_err(Into::into)
    }

    async fn create_notebook(&self, submission: &NotebookSubmission) -> DocentResult<CatalogItem> {
        let response = self
            .client
            .post(self.url("notebooks"))
            .header(&self.employee_header, &submission.mtrc)
            .json(submission)
            .send()
            .await?;
        let response = Self::check(response).await?;
        response.json().await.map_err(Into::into)
    }

    async fn download(&self, kind: ItemKind, id: i64) -> DocentResult<Vec<u8>> {
        let path = format!("{}/{}/download", Self::items_path(kind), id);
        let response = self.client.get(self.url(&path)).send().await?;
        let response = Self::check(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn analyze_document(&self, file: &FileHandle) -> DocentResult<Value> {
        let form = Form::new().part("file", Self::file_part(file)?);
        let response = self
            .client
            .post(self.url("analyze-document"))
            .multipart(form)
            .send()
            .await?;
        let response = Self::check(response).await?;
        response.json().await.map_err(Into::into)
    }
}
