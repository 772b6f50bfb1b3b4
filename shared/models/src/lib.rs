//! # Docent Core Domain Models
//!
//! This module contains the core domain models for the Docent model-documentation
//! catalog. All models implement serialization/deserialization with serde; wire
//! types use the portal API's camelCase field names.
//!
//! ## Key Models
//!
//! - **CatalogItem**: A listed article or notebook with category, tags and provenance
//! - **Tag**: A vocabulary tag, either persisted (server id) or pending (client-synthesized)
//! - **Category / Subcategory**: The two-level classification the catalog is browsed by
//! - **UploadDraft**: Mutable form state for the contribution workflow
//! - **DocumentMetadata**: Loosely-typed metadata extracted from the analysis service

pub mod analysis;
pub mod catalog;
pub mod draft;
pub mod tag;


pub use analysis::*;
pub use catalog::*;
pub use draft::*;
pub use tag::*;
