use std::sync::Arc;

use vetrina_core::CatalogueService;

/// Shared handler state: the catalogue service behind an `Arc`, cloned
/// per request.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CatalogueService>,
}
