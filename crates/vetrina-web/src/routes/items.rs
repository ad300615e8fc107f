//! Single item lookup by IRI.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::{routing::get, Json, Router};
use vetrina_core::CardRecord;

use crate::locale::resolve_locale;
use crate::state::AppState;
use crate::Result;

pub fn item_routes() -> Router<AppState> {
    Router::new().route("/api/{collection}/items/{iri}", get(item_detail))
}

async fn item_detail(
    State(state): State<AppState>,
    Path((collection, iri)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<CardRecord>> {
    let locale = resolve_locale(&headers);
    let card = state.service.item_detail(&collection, locale, &iri).await?;
    Ok(Json(card))
}
