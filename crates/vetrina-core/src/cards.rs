//! Normalization of raw result bindings into the card page shape.

use serde::Serialize;
use tracing::warn;

use crate::endpoint::Binding;

/// Variables tried, in order, for a card's identity.
pub const IDENTITY_VARIABLES: &[&str] = &["item", "id", "uri"];

/// Variables tried, in order, for a card's title.
pub const TITLE_VARIABLES: &[&str] = &["title", "label"];

/// One catalogued item as presented on a result card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardRecord {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CardRecord {
    /// Map one binding to a card. Rows without an identity binding yield
    /// `None`; missing optional fields are simply absent.
    pub fn from_binding(binding: &Binding) -> Option<Self> {
        let id = binding.first_of(IDENTITY_VARIABLES)?.to_string();
        let title = binding
            .first_of(TITLE_VARIABLES)
            .unwrap_or(&id)
            .to_string();
        Some(Self {
            id,
            title,
            summary: binding.get("summary").map(str::to_string),
            image: binding.get("image").map(str::to_string),
        })
    }
}

/// One page of results plus the page count for the whole match set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage {
    pub cards: Vec<CardRecord>,
    pub total_pages: usize,
}

impl ResultPage {
    /// Shape the count and page query results into a result page.
    pub fn assemble(count_rows: &[Binding], page_rows: &[Binding], page_size: usize) -> Self {
        let total = total_from(count_rows);
        Self {
            cards: page_rows.iter().filter_map(CardRecord::from_binding).collect(),
            total_pages: total_pages(total, page_size),
        }
    }
}

/// Total match count from the count query result. Any parse failure
/// degrades to 0 rather than failing the request: the page data itself
/// may still be valid.
fn total_from(count_rows: &[Binding]) -> u64 {
    let raw = count_rows
        .first()
        .and_then(|row| row.get("total").or_else(|| row.values().next()));
    match raw.map(str::parse::<u64>) {
        Some(Ok(total)) => total,
        Some(Err(_)) | None => {
            warn!(value = ?raw, "unparseable count result, defaulting to 0");
            0
        }
    }
}

/// Number of pages needed for `total` items, never less than 1.
pub fn total_pages(total: u64, page_size: usize) -> usize {
    let page_size = page_size.max(1) as u64;
    (total.div_ceil(page_size).max(1)) as usize
}
