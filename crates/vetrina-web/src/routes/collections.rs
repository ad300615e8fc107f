//! Collection listing for the homepage.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::{routing::get, Json, Router};

use crate::locale::resolve_locale;
use crate::state::AppState;

pub fn collection_routes() -> Router<AppState> {
    Router::new().route("/api/collections", get(list_collections))
}

async fn list_collections(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    let locale = resolve_locale(&headers);
    let collections: Vec<serde_json::Value> = state
        .service
        .registry()
        .entries()
        .iter()
        .map(|entry| {
            serde_json::json!({
                "id": entry.id,
                "title": entry.title_for(locale),
                "keywords": entry.keywords_for(locale),
                "image": entry.image,
            })
        })
        .collect();

    Json(serde_json::json!({ "collections": collections }))
}
