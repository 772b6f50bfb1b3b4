//! Upload Workflow
//!
//! Drives a draft from form state to a created catalog item:
//! validate, pre-check the title for duplicates, submit, refresh the
//! catalog. Submission requires a persisted employee identifier and is a
//! mutual-exclusion region: a second submit while one is in flight is
//! ignored, not queued.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use docent_models::{
    ArticleSubmission, CatalogItem, ItemFilter, ItemKind, NotebookSubmission, UploadDraft,
    MAX_SELECTED_TAGS,
};
use docent_utils::{
    missing_fields_error, validate_file_type, validate_model, DocentError, DocentResult,
};

use crate::api_client::CatalogApi;
use crate::controller::CatalogController;
use crate::identity::IdentityProvider;
use crate::metadata::apply_to_draft;

/// Server wording that marks a unique-constraint violation; recognized so
/// the user gets a retryable duplicate-title message instead of raw SQL.
const DUPLICATE_KEY_MARKER: &str = "duplicate key";

const NOTEBOOK_FILE_TYPES: &[&str] = &["ipynb"];
const ARTICLE_FILE_TYPES: &[&str] = &["pdf"];

/// Workflow states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadState {
    /// No submission in progress
    Idle,
    /// Checking required fields
    Validating,
    /// Comparing the title against the existing list
    CheckingDuplicate,
    /// Request in flight
    Submitting,
    /// Item created
    Succeeded,
    /// Submission rejected or errored
    Failed,
}

impl UploadState {
    /// Check if transition is valid
    pub fn can_transition_to(&self, target: UploadState) -> bool {
        use UploadState::*;

        match (self, target) {
            (Idle, Validating) => true,

            (Validating, CheckingDuplicate) => true,
            (Validating, Idle) => true,

            (CheckingDuplicate, Submitting) => true,
            (CheckingDuplicate, Idle) => true,

            (Submitting, Succeeded) => true,
            (Submitting, Failed) => true,

            // A finished run returns to Idle
            (Succeeded, Idle) => true,
            (Failed, Idle) => true,

            _ => false,
        }
    }

    /// Whether a run has finished, one way or the other.
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadState::Succeeded | UploadState::Failed)
    }
}

impl std::fmt::Display for UploadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Validating => write!(f, "validating"),
            Self::CheckingDuplicate => write!(f, "checking_duplicate"),
            Self::Submitting => write!(f, "submitting"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Confirmation handed back after a successful submission.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub mtrc: String,
    /// Client-formatted submission time.
    pub submitted_at: String,
    pub item: CatalogItem,
}

/// The contribution workflow for one catalog list.
pub struct UploadWorkflow {
    api: Arc<dyn CatalogApi>,
    identity: Arc<dyn IdentityProvider>,
    controller: Arc<CatalogController>,
    state: Arc<RwLock<UploadState>>,
}

impl UploadWorkflow {
    pub fn new(
        api: Arc<dyn CatalogApi>,
        identity: Arc<dyn IdentityProvider>,
        controller: Arc<CatalogController>,
    ) -> Self {
        Self {
            api,
            identity,
            controller,
            state: Arc::new(RwLock::new(UploadState::Idle)),
        }
    }

    pub async fn state(&self) -> UploadState {
        *self.state.read().await
    }

    /// Submit the draft.
    ///
    /// Returns `Ok(None)` when another submission is already in flight (the
    /// re-entrant click case). A missing employee identifier blocks before
    /// any network call and leaves the workflow `Idle`. On success the
    /// draft is reset and the catalog refetched.
    pub async fn submit(&self, draft: &mut UploadDraft) -> DocentResult<Option<UploadReceipt>> {
        let mtrc;
        {
            let mut state = self.state.write().await;
            if *state != UploadState::Idle {
                tracing::info!(state = %*state, "submit ignored, a submission is in flight");
                return Ok(None);
            }
            match self.identity.employee_id() {
                Some(id) if !id.trim().is_empty() => mtrc = id,
                _ => {
                    return Err(DocentError::auth_required(
                        "Sign in with your MTRC before uploading",
                    ))
                }
            }
            *state = UploadState::Validating;
        }

        let outcome = self.run(draft, &mtrc).await;
        *self.state.write().await = UploadState::Idle;
        outcome.map(Some)
    }

    /// Abandon the current draft and return the workflow to `Idle`.
    pub async fn cancel(&self, draft: &mut UploadDraft) {
        draft.reset();
        *self.state.write().await = UploadState::Idle;
    }

    /// Ask the analysis service about the drafted file and pre-fill the
    /// form fields and tag selection from whatever it answers.
    pub async fn analyze_and_prefill(&self, draft: &mut UploadDraft) -> DocentResult<()> {
        let file = draft
            .file
            .clone()
            .ok_or_else(|| DocentError::validation("file", "Attach a document to analyze"))?;
        let payload = self.api.analyze_document(&file).await?;
        let vocabulary = self.controller.vocabulary().await;
        apply_to_draft(draft, &payload, &vocabulary);
        Ok(())
    }

    async fn run(&self, draft: &mut UploadDraft, mtrc: &str) -> DocentResult<UploadReceipt> {
        let missing = draft.missing_required_fields();
        if !missing.is_empty() {
            return Err(missing_fields_error(&missing));
        }
        if draft.selected_tags.len() > MAX_SELECTED_TAGS {
            return Err(DocentError::validation(
                "tags",
                format!("At most {} tags can be selected", MAX_SELECTED_TAGS),
            ));
        }
        let kind = draft
            .kind
            .ok_or_else(|| DocentError::internal("draft kind vanished after validation"))?;

        self.set_state(UploadState::CheckingDuplicate).await;
        if let Some(duplicate) = self.duplicate_title(kind, draft.title.trim()).await {
            return Err(duplicate);
        }

        self.set_state(UploadState::Submitting).await;
        let created = match kind {
            ItemKind::Article => {
                let submission = build_article_submission(draft, mtrc)?;
                validate_model(&submission)?;
                self.api.create_article(&submission).await
            }
            ItemKind::Notebook => {
                let submission = build_notebook_submission(draft, mtrc)?;
                validate_model(&submission)?;
                self.api.create_notebook(&submission).await
            }
        };

        match created {
            Ok(item) => {
                self.set_state(UploadState::Succeeded).await;
                tracing::info!(id = item.id, title = %item.title, "catalog item created");
                draft.reset();
                self.controller.refetch_items().await;
                Ok(UploadReceipt {
                    mtrc: mtrc.to_string(),
                    submitted_at: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                    item,
                })
            }
            Err(e) => {
                self.set_state(UploadState::Failed).await;
                Err(classify_server_error(e))
            }
        }
    }

    /// Case-insensitive title pre-check against the full unfiltered list.
    /// A failed check is treated as non-duplicate: availability wins over
    /// strict duplicate prevention.
    async fn duplicate_title(&self, kind: ItemKind, title: &str) -> Option<DocentError> {
        match self.api.items(kind, &ItemFilter::default()).await {
            Ok(items) => {
                if items.iter().any(|item| item.title_matches(title)) {
                    Some(DocentError::duplicate(format!(
                        "An item named '{}' already exists. Choose a different {}.",
                        title,
                        kind.title_field()
                    )))
                } else {
                    None
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "duplicate pre-check failed, proceeding without it");
                None
            }
        }
    }

    async fn set_state(&self, to: UploadState) {
        let mut state = self.state.write().await;
        tracing::debug!(from = %*state, to = %to, "upload state transition");
        *state = to;
    }
}

fn build_article_submission(draft: &UploadDraft, mtrc: &str) -> DocentResult<ArticleSubmission> {
    let year = draft
        .year
        .ok_or_else(|| DocentError::validation("year", "Year is required"))?;
    if let Some(file) = &draft.file {
        validate_file_type(&file.file_name, ARTICLE_FILE_TYPES)?;
    }
    Ok(ArticleSubmission {
        title: draft.title.trim().to_string(),
        authors: non_empty(&draft.authors),
        year,
        publisher: non_empty(&draft.publisher),
        abstract_full: non_empty(&draft.abstract_full),
        abstract_short: non_empty(&draft.abstract_short),
        url: non_empty(&draft.url),
        category_id: parse_id("category", &draft.category_id)?,
        subcategory_id: parse_id("subcategory", &draft.subcategory_id)?,
        tag_names: draft.tag_names(),
        file: draft.file.clone(),
        mtrc: mtrc.to_string(),
    })
}

fn build_notebook_submission(draft: &UploadDraft, mtrc: &str) -> DocentResult<NotebookSubmission> {
    let file = draft
        .file
        .as_ref()
        .ok_or_else(|| DocentError::validation("file", "A notebook file is required"))?;
    validate_file_type(&file.file_name, NOTEBOOK_FILE_TYPES)?;
    Ok(NotebookSubmission {
        name: draft.title.trim().to_string(),
        abstract_short: non_empty(&draft.abstract_short),
        category_id: parse_optional_id("category", &draft.category_id)?,
        subcategory_id: parse_optional_id("subcategory", &draft.subcategory_id)?,
        tag_names: draft.tag_names(),
        file_path: file.file_name.clone(),
        mtrc: mtrc.to_string(),
    })
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_id(field: &str, raw: &str) -> DocentResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| DocentError::validation(field, format!("'{}' is not a valid {} id", raw.trim(), field)))
}

fn parse_optional_id(field: &str, raw: &str) -> DocentResult<Option<i64>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_id(field, raw).map(Some)
}

fn classify_server_error(error: DocentError) -> DocentError {
    match &error {
        DocentError::Network { message }
            if message.to_lowercase().contains(DUPLICATE_KEY_MARKER) =>
        {
            DocentError::duplicate(
                "An item with this title already exists. Choose a different title and retry.",
            )
        }
        _ => error,
    }
}
