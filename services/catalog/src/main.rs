//! Docent Catalog Engine
//!
//! Demo entry point: loads configuration, initializes logging and drives
//! one initial catalog load against the configured portal API.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use docent_catalog::{CatalogController, HttpCatalogApi, IdentityProvider, ProfileStore};
use docent_models::ItemKind;
use docent_utils::{init_logging, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load_or_default();
    init_logging(&config.logging)?;
    info!("Starting Docent catalog engine");

    let identity = ProfileStore::new(&config.identity.profile_path);
    match identity.employee_id() {
        Some(mtrc) => info!(mtrc = %mtrc, "signed in"),
        None => info!("no persisted identity, uploads will be blocked"),
    }

    let api = Arc::new(HttpCatalogApi::new(&config.api)?);
    let controller = CatalogController::new(api, ItemKind::Article, &config.catalog);
    controller.load_initial().await;

    let state = controller.state().await;
    info!(
        categories = state.categories.len(),
        subcategories = state.subcategories.len(),
        tags = state.vocabulary.len(),
        items = state.items.len(),
        pages = state.page.total_pages,
        "initial load complete"
    );
    if let Some(error) = &state.error {
        warn!(error = %error, "item list unavailable");
    }

    Ok(())
}
