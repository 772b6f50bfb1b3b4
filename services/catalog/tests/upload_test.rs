//! Upload workflow behavior: identity gating, validation, duplicate
//! checking, submission and the AI pre-fill path.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::{sample_file, MockCatalogApi};
use docent_catalog::{CatalogController, StaticIdentity, UploadState, UploadWorkflow};
use docent_models::{ItemKind, Tag, TagId, UploadDraft};
use docent_utils::{CatalogConfig, DocentError};

fn build_workflow(
    api: Arc<MockCatalogApi>,
    identity: StaticIdentity,
    kind: ItemKind,
) -> (UploadWorkflow, Arc<CatalogController>) {
    let controller = Arc::new(CatalogController::new(
        api.clone(),
        kind,
        &CatalogConfig {
            page_size: 9,
            page_window: 5,
        },
    ));
    let workflow = UploadWorkflow::new(api, Arc::new(identity), controller.clone());
    (workflow, controller)
}

fn article_draft() -> UploadDraft {
    let mut draft = UploadDraft::new(ItemKind::Article);
    draft.title = "Scaling Laws".to_string();
    draft.year = Some(2024);
    draft.category_id = "1".to_string();
    draft.subcategory_id = "10".to_string();
    draft
}

#[tokio::test]
async fn article_submission_succeeds_and_refreshes() {
    let api = Arc::new(MockCatalogApi::new());
    let (workflow, _controller) =
        build_workflow(api.clone(), StaticIdentity::new("E1234"), ItemKind::Article);

    let mut draft = article_draft();
    let receipt = workflow.submit(&mut draft).await.unwrap().unwrap();

    assert_eq!(receipt.mtrc, "E1234");
    assert_eq!(receipt.item.title, "Scaling Laws");
    assert_eq!(receipt.item.created_by, "E1234");
    assert!(!receipt.submitted_at.is_empty());

    assert_eq!(api.create_calls.load(Ordering::SeqCst), 1);
    // duplicate pre-check plus the post-create refresh
    assert_eq!(api.items_calls.load(Ordering::SeqCst), 2);

    assert_eq!(draft, UploadDraft::default());
    assert_eq!(workflow.state().await, UploadState::Idle);
}

#[tokio::test]
async fn missing_identity_blocks_before_any_network_call() {
    let api = Arc::new(MockCatalogApi::new());
    let (workflow, _controller) =
        build_workflow(api.clone(), StaticIdentity::anonymous(), ItemKind::Article);

    let mut draft = article_draft();
    let error = workflow.submit(&mut draft).await.unwrap_err();

    assert_eq!(error.error_code(), "AUTH_REQUIRED");
    assert_eq!(api.network_calls.load(Ordering::SeqCst), 0);
    assert_eq!(workflow.state().await, UploadState::Idle);
}

#[tokio::test]
async fn missing_required_fields_block_submission() {
    let api = Arc::new(MockCatalogApi::new());
    let (workflow, _controller) =
        build_workflow(api.clone(), StaticIdentity::new("E1234"), ItemKind::Article);

    let mut draft = UploadDraft::new(ItemKind::Article);
    let error = workflow.submit(&mut draft).await.unwrap_err();

    assert_eq!(error.error_code(), "VALIDATION_ERROR");
    assert!(error.to_string().contains("title"));
    assert!(error.to_string().contains("year"));
    assert_eq!(api.network_calls.load(Ordering::SeqCst), 0);
    assert_eq!(workflow.state().await, UploadState::Idle);
}

#[tokio::test]
async fn duplicate_title_is_rejected_case_insensitively() {
    let api = Arc::new(MockCatalogApi::new());
    let (workflow, _controller) =
        build_workflow(api.clone(), StaticIdentity::new("E1234"), ItemKind::Article);

    let mut draft = article_draft();
    draft.title = "my paper".to_string(); // list holds "My Paper"
    let error = workflow.submit(&mut draft).await.unwrap_err();

    assert_eq!(error.error_code(), "DUPLICATE_ENTRY");
    assert_eq!(api.create_calls.load(Ordering::SeqCst), 0);
    assert_eq!(workflow.state().await, UploadState::Idle);
}

#[tokio::test]
async fn failed_duplicate_check_proceeds_with_submission() {
    let api = Arc::new(MockCatalogApi::new());
    api.script_items(0, Err(DocentError::network("listing down")));
    let (workflow, _controller) =
        build_workflow(api.clone(), StaticIdentity::new("E1234"), ItemKind::Article);

    let mut draft = article_draft();
    let receipt = workflow.submit(&mut draft).await.unwrap();

    assert!(receipt.is_some());
    assert_eq!(api.create_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn server_duplicate_key_error_is_recognized() {
    let api = Arc::new(MockCatalogApi::new());
    *api.create_error.lock().unwrap() = Some(DocentError::network(
        "500 Internal Server Error: duplicate key value violates unique constraint",
    ));
    let (workflow, _controller) =
        build_workflow(api.clone(), StaticIdentity::new("E1234"), ItemKind::Article);

    let mut draft = article_draft();
    let error = workflow.submit(&mut draft).await.unwrap_err();

    assert_eq!(error.error_code(), "DUPLICATE_ENTRY");
    assert_eq!(workflow.state().await, UploadState::Idle);
}

#[tokio::test(start_paused = true)]
async fn reentrant_submit_is_ignored_not_queued() {
    let mut mock = MockCatalogApi::new();
    mock.create_delay = Duration::from_millis(50);
    let api = Arc::new(mock);
    let (workflow, _controller) =
        build_workflow(api.clone(), StaticIdentity::new("E1234"), ItemKind::Article);

    let mut first_draft = article_draft();
    let mut second_draft = article_draft();
    second_draft.title = "Another Paper".to_string();

    let (first, second) = tokio::join!(workflow.submit(&mut first_draft), async {
        tokio::time::sleep(Duration::from_millis(1)).await;
        workflow.submit(&mut second_draft).await
    });

    assert!(first.unwrap().is_some());
    assert!(second.unwrap().is_none());
    assert_eq!(api.create_calls.load(Ordering::SeqCst), 1);
    assert_eq!(workflow.state().await, UploadState::Idle);
}

#[tokio::test]
async fn notebook_submission_references_uploaded_file() {
    let api = Arc::new(MockCatalogApi::new());
    let (workflow, _controller) =
        build_workflow(api.clone(), StaticIdentity::new("E1234"), ItemKind::Notebook);

    let mut draft = UploadDraft::new(ItemKind::Notebook);
    draft.title = "Fine-tuning Demo".to_string();
    draft.file = Some(sample_file("demo.txt"));
    let error = workflow.submit(&mut draft).await.unwrap_err();
    assert_eq!(error.error_code(), "VALIDATION_ERROR");

    let mut draft = UploadDraft::new(ItemKind::Notebook);
    draft.title = "Fine-tuning Demo".to_string();
    draft.file = Some(sample_file("demo.ipynb"));
    let receipt = workflow.submit(&mut draft).await.unwrap().unwrap();

    assert_eq!(receipt.item.file_path.as_deref(), Some("demo.ipynb"));
    let submission = api.last_notebook.lock().unwrap().clone().unwrap();
    assert_eq!(submission.file_path, "demo.ipynb");
    assert_eq!(submission.name, "Fine-tuning Demo");
    assert_eq!(submission.mtrc, "E1234");
}

#[tokio::test]
async fn too_many_tags_block_submission() {
    let api = Arc::new(MockCatalogApi::new());
    let (workflow, _controller) =
        build_workflow(api.clone(), StaticIdentity::new("E1234"), ItemKind::Article);

    let mut draft = article_draft();
    draft.selected_tags = (0..5)
        .map(|i| Tag::persisted(i, format!("t{}", i)))
        .collect();
    let error = workflow.submit(&mut draft).await.unwrap_err();

    assert_eq!(error.error_code(), "VALIDATION_ERROR");
    assert_eq!(api.network_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn cancel_resets_draft_and_state() {
    let api = Arc::new(MockCatalogApi::new());
    let (workflow, _controller) =
        build_workflow(api.clone(), StaticIdentity::new("E1234"), ItemKind::Article);

    let mut draft = article_draft();
    workflow.cancel(&mut draft).await;

    assert_eq!(draft, UploadDraft::default());
    assert_eq!(workflow.state().await, UploadState::Idle);
}

#[tokio::test]
async fn analyze_prefills_draft_from_fenced_response() {
    let api = Arc::new(MockCatalogApi::new());
    *api.analyze_payload.lock().unwrap() = Some(serde_json::json!({
        "rawAnalysis": "```json\n{\"title\":\"Vision Transformers\",\"year\":\"2021\",\"categoryId\":2,\"keywords\":\"vision, ViT\"}\n```"
    }));
    let (workflow, controller) =
        build_workflow(api.clone(), StaticIdentity::new("E1234"), ItemKind::Article);
    controller.load_initial().await;

    let mut draft = UploadDraft::new(ItemKind::Article);
    draft.file = Some(sample_file("paper.pdf"));
    workflow.analyze_and_prefill(&mut draft).await.unwrap();

    assert_eq!(draft.title, "Vision Transformers");
    assert_eq!(draft.year, Some(2021));
    assert_eq!(draft.category_id, "2");
    assert!(draft.file.is_some());

    assert_eq!(draft.selected_tags.len(), 2);
    assert_eq!(draft.selected_tags[0], Tag::persisted(2, "vision"));
    assert_eq!(draft.selected_tags[1].name, "ViT");
    assert!(matches!(draft.selected_tags[1].id, TagId::Pending(_)));
}

#[tokio::test]
async fn analyze_without_file_is_a_validation_error() {
    let api = Arc::new(MockCatalogApi::new());
    let (workflow, _controller) =
        build_workflow(api.clone(), StaticIdentity::new("E1234"), ItemKind::Article);

    let mut draft = UploadDraft::new(ItemKind::Article);
    let error = workflow.analyze_and_prefill(&mut draft).await.unwrap_err();
    assert_eq!(error.error_code(), "VALIDATION_ERROR");
    assert_eq!(api.network_calls.load(Ordering::SeqCst), 0);
}
