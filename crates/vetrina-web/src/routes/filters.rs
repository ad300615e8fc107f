//! Facet listing for a collection.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::{routing::get, Json, Router};
use serde::Deserialize;
use vetrina_core::FacetListing;

use crate::locale::resolve_locale;
use crate::state::AppState;
use crate::Result;

pub fn filter_routes() -> Router<AppState> {
    Router::new().route("/api/{collection}/filters", get(list_filters))
}

#[derive(Debug, Deserialize)]
struct FiltersQuery {
    /// Skip remote option/range queries and return only keys and labels
    #[serde(default, rename = "structureOnly")]
    structure_only: bool,
}

async fn list_filters(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(query): Query<FiltersQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<FacetListing>>> {
    let locale = resolve_locale(&headers);
    let facets = state
        .service
        .list_facets(&collection, locale, query.structure_only)
        .await?;
    Ok(Json(facets))
}
