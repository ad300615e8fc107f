//! Request-level catalogue operations: facet listings, card pages, and
//! item details.
//!
//! The service owns no mutable state; it borrows the shared registry and
//! issues remote queries through the endpoint client. Every operation is
//! scoped to one request and builds its queries fresh.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::cards::{CardRecord, ResultPage};
use crate::compose::QueryComposer;
use crate::config::{CollectionConfig, FacetKind};
use crate::endpoint::{Binding, EndpointClient};
use crate::error::ServiceError;
use crate::facet::Selection;
use crate::locale::Locale;
use crate::registry::CollectionRegistry;

/// One facet as presented in the filters listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetListing {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FacetOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<FacetRange>,
}

/// One selectable option of a checkbox facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    pub label: String,
    pub uri: String,
}

/// Year bounds of a range facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FacetRange {
    pub min: i64,
    pub max: i64,
}

/// Read-only facade over the registry and the remote endpoints.
pub struct CatalogueService {
    registry: Arc<CollectionRegistry>,
    client: EndpointClient,
    composer: QueryComposer,
}

impl CatalogueService {
    pub fn new(registry: Arc<CollectionRegistry>, client: EndpointClient) -> Self {
        Self {
            registry,
            client,
            composer: QueryComposer::new(),
        }
    }

    pub fn registry(&self) -> &CollectionRegistry {
        &self.registry
    }

    fn config(&self, collection: &str) -> Result<&Arc<CollectionConfig>, ServiceError> {
        self.registry
            .config(collection)
            .ok_or_else(|| ServiceError::UnknownCollection(collection.to_string()))
    }

    /// Facets of a collection, in config-declared order. With
    /// `structure_only` no remote calls are made and only key, label, and
    /// kind are filled in; otherwise each facet's option or range query
    /// runs against the collection's endpoint.
    pub async fn list_facets(
        &self,
        collection: &str,
        locale: Locale,
        structure_only: bool,
    ) -> Result<Vec<FacetListing>, ServiceError> {
        let config = self.config(collection)?;
        let mut listings = Vec::with_capacity(config.facets.len());

        for facet in &config.facets {
            let mut listing = FacetListing {
                key: facet.key.clone(),
                label: facet.label_for(locale).to_string(),
                kind: facet.kind_name(),
                options: None,
                range: None,
            };

            if !structure_only {
                match &facet.kind {
                    FacetKind::Checkbox { options_query, .. } => {
                        let query = self.composer.localize(options_query, locale);
                        let rows = self.client.select(&config.endpoint, &query).await?;
                        listing.options = Some(options_from(&rows));
                    }
                    FacetKind::Range { range_query, .. } => {
                        let query = self.composer.localize(range_query, locale);
                        let rows = self.client.select(&config.endpoint, &query).await?;
                        listing.range = range_from(&rows);
                    }
                }
            }
            listings.push(listing);
        }

        debug!(collection, facets = listings.len(), structure_only, "listed facets");
        Ok(listings)
    }

    /// One page of result cards for a selection, plus the total page
    /// count. Runs the count query first: its result bounds the page.
    pub async fn search_cards(
        &self,
        collection: &str,
        locale: Locale,
        selection: &Selection,
        page: usize,
    ) -> Result<ResultPage, ServiceError> {
        let config = self.config(collection)?;

        let count_query = self.composer.count(config, locale, selection)?;
        let count_rows = self.client.select(&config.endpoint, count_query.text()).await?;

        let page_query = self.composer.page(config, locale, selection, page)?;
        let page_rows = self.client.select(&config.endpoint, page_query.text()).await?;

        let result = ResultPage::assemble(&count_rows, &page_rows, config.card_template.limit);
        debug!(
            collection,
            page,
            cards = result.cards.len(),
            total_pages = result.total_pages,
            "searched cards"
        );
        Ok(result)
    }

    /// The card for a single item, looked up by IRI.
    pub async fn item_detail(
        &self,
        collection: &str,
        locale: Locale,
        iri: &str,
    ) -> Result<CardRecord, ServiceError> {
        let config = self.config(collection)?;
        let query = self.composer.detail(config, locale, iri)?;
        let rows = self.client.select(&config.endpoint, query.text()).await?;
        rows.first()
            .and_then(CardRecord::from_binding)
            .ok_or_else(|| ServiceError::ItemNotFound(iri.to_string()))
    }
}

fn options_from(rows: &[Binding]) -> Vec<FacetOption> {
    rows.iter()
        .filter_map(|row| {
            let uri = row.get("uri")?;
            let label = row
                .get("label")
                .map(str::to_string)
                .unwrap_or_else(|| local_name(uri).to_string());
            Some(FacetOption {
                label,
                uri: uri.to_string(),
            })
        })
        .collect()
}

/// Last path or fragment segment of an IRI, as a display fallback.
fn local_name(iri: &str) -> &str {
    iri.rsplit(['/', '#']).next().unwrap_or(iri)
}

fn range_from(rows: &[Binding]) -> Option<FacetRange> {
    let row = rows.first()?;
    let min = row.get("min")?.parse::<f64>().ok()?;
    let max = row.get("max")?.parse::<f64>().ok()?;
    Some(FacetRange {
        min: min.trunc() as i64,
        max: max.trunc() as i64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_read_label_and_uri_with_local_name_fallback() {
        let rows = vec![
            Binding::from_pairs([("label", "Bronzo"), ("uri", "http://example.org/bronze")]),
            Binding::from_pairs([("uri", "http://example.org/vocab#marble")]),
            Binding::from_pairs([("label", "orphan, no uri")]),
        ];
        let options = options_from(&rows);
        assert_eq!(
            options,
            vec![
                FacetOption {
                    label: "Bronzo".into(),
                    uri: "http://example.org/bronze".into()
                },
                FacetOption {
                    label: "marble".into(),
                    uri: "http://example.org/vocab#marble".into()
                },
            ]
        );
    }

    #[test]
    fn range_requires_both_parseable_bounds() {
        let rows = vec![Binding::from_pairs([("min", "1500"), ("max", "1887.5")])];
        assert_eq!(
            range_from(&rows),
            Some(FacetRange {
                min: 1500,
                max: 1887
            })
        );

        let rows = vec![Binding::from_pairs([("min", "1500")])];
        assert_eq!(range_from(&rows), None);

        let rows = vec![Binding::from_pairs([("min", "circa 1500"), ("max", "1600")])];
        assert_eq!(range_from(&rows), None);

        assert_eq!(range_from(&[]), None);
    }
}
