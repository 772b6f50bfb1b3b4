//! # Docent Catalog Engine
//!
//! Headless core of the Docent model-documentation portal's catalog UI:
//! the typed portal API client, the catalog controller (concurrent initial
//! load, filter-driven refetching), the tag filter subsystem shared between
//! filtering and uploading, the pagination engine, the upload workflow and
//! the AI-metadata extractor. A rendering layer binds to
//! [`CatalogController`] and [`UploadWorkflow`]; everything network-shaped
//! goes through the injectable [`CatalogApi`] trait.

pub mod api_client;
pub mod controller;
pub mod identity;
pub mod metadata;
pub mod pagination;
pub mod tag_filter;
pub mod upload;


pub use api_client::{CatalogApi, HttpCatalogApi};
pub use controller::{CatalogController, CatalogState};
pub use identity::{IdentityProvider, ProfileStore, StaticIdentity, UserProfile};
pub use metadata::{apply_to_draft, extract_metadata, normalize_keywords, reconcile_tags};
pub use pagination::{page_window, paginate, PageState, DEFAULT_PAGE_SIZE, PAGE_WINDOW_SIZE};
pub use tag_filter::{TagFilter, TagSelector};
pub use upload::{UploadReceipt, UploadState, UploadWorkflow};
