//! Paginated card search over a collection.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::{routing::post, Json, Router};
use serde::Deserialize;
use vetrina_core::{ResultPage, Selection};

use crate::locale::resolve_locale;
use crate::state::AppState;
use crate::Result;

pub fn search_routes() -> Router<AppState> {
    Router::new().route("/api/{collection}/search", post(search_cards))
}

#[derive(Debug, Deserialize)]
struct SearchRequest {
    #[serde(default)]
    filters: Selection,
    #[serde(default = "default_page")]
    page: usize,
}

fn default_page() -> usize {
    1
}

async fn search_cards(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    Json(request): Json<SearchRequest>,
) -> Result<Json<ResultPage>> {
    let locale = resolve_locale(&headers);
    let page = state
        .service
        .search_cards(&collection, locale, &request.filters, request.page)
        .await?;
    Ok(Json(page))
}
