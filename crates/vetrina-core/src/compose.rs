//! Assembly of complete count and page queries from a collection's
//! configuration and a user's facet selections.

use regex::Regex;

use crate::cards::{IDENTITY_VARIABLES, TITLE_VARIABLES};
use crate::config::CollectionConfig;
use crate::error::SelectionError;
use crate::facet::{build_clause, is_safe_iri, Selection};
use crate::locale::{Locale, LocaleInjector};

/// What a composed query computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Total number of distinct matching subjects
    Count,
    /// One page of result cards
    Page,
}

/// A complete query string, built fresh per request and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedQuery {
    text: String,
    kind: QueryKind,
}

impl ComposedQuery {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }
}

/// Builds concrete queries out of a base pattern, facet fragments, locale
/// substitution, ordering, and pagination.
#[derive(Debug, Clone)]
pub struct QueryComposer {
    injector: LocaleInjector,
    variable: Regex,
}

impl QueryComposer {
    pub fn new() -> Self {
        Self {
            injector: LocaleInjector::new(),
            variable: Regex::new(r"\?([A-Za-z_][A-Za-z0-9_]*)").expect("valid regex"),
        }
    }

    /// Locale-inject a query template without further composition. Used
    /// for facet option and range queries, which are complete as
    /// configured.
    pub fn localize(&self, text: &str, locale: Locale) -> String {
        self.injector.inject(text, locale)
    }

    /// The locale-injected base pattern plus every selected facet's
    /// fragment, in config-declared facet order.
    pub fn compose_where(
        &self,
        config: &CollectionConfig,
        locale: Locale,
        selection: &Selection,
    ) -> Result<String, SelectionError> {
        let mut pattern = self
            .injector
            .inject(&config.card_template.where_pattern, locale)
            .trim_end()
            .to_string();
        for facet in &config.facets {
            if let Some(clause) = build_clause(facet, selection)? {
                pattern.push('\n');
                pattern.push_str(&clause);
            }
        }
        Ok(pattern)
    }

    /// Count query: distinct matching subjects under the composed pattern.
    pub fn count(
        &self,
        config: &CollectionConfig,
        locale: Locale,
        selection: &Selection,
    ) -> Result<ComposedQuery, SelectionError> {
        let pattern = self.compose_where(config, locale, selection)?;
        let subject = self.subject_variable(&config.card_template.select);
        let text = format!(
            "{}SELECT (COUNT(DISTINCT ?{subject}) AS ?total)\nWHERE {{\n{pattern}\n}}",
            prefix_block(config)
        );
        Ok(ComposedQuery {
            text,
            kind: QueryKind::Count,
        })
    }

    /// Page query: the card projection over the composed pattern, with
    /// deterministic ordering and pagination. `page` is clamped to 1.
    pub fn page(
        &self,
        config: &CollectionConfig,
        locale: Locale,
        selection: &Selection,
        page: usize,
    ) -> Result<ComposedQuery, SelectionError> {
        let pattern = self.compose_where(config, locale, selection)?;
        let select = self
            .injector
            .inject(&config.card_template.select, locale);
        let page = page.max(1);
        let limit = config.card_template.limit;

        let mut text = format!(
            "{}SELECT DISTINCT {}\nWHERE {{\n{pattern}\n}}",
            prefix_block(config),
            select.trim()
        );
        if let Some(order) = self.order_variable(&config.card_template.select) {
            text.push_str(&format!("\nORDER BY ASC(LCASE(STR(?{order})))"));
        }
        text.push_str(&format!("\nLIMIT {limit}\nOFFSET {}", (page - 1) * limit));

        Ok(ComposedQuery {
            text,
            kind: QueryKind::Page,
        })
    }

    /// Single-item query: the card projection with the subject bound to
    /// one validated IRI.
    pub fn detail(
        &self,
        config: &CollectionConfig,
        locale: Locale,
        iri: &str,
    ) -> Result<ComposedQuery, SelectionError> {
        if !is_safe_iri(iri) {
            return Err(SelectionError::UnsafeIri(iri.to_string()));
        }
        let pattern = self
            .injector
            .inject(&config.card_template.where_pattern, locale)
            .trim_end()
            .to_string();
        let select = self
            .injector
            .inject(&config.card_template.select, locale);
        let subject = self.subject_variable(&config.card_template.select);

        let text = format!(
            "{}SELECT DISTINCT {}\nWHERE {{\n{pattern}\nVALUES ?{subject} {{ <{iri}> }}\n}}\nLIMIT 1",
            prefix_block(config),
            select.trim()
        );
        Ok(ComposedQuery {
            text,
            kind: QueryKind::Page,
        })
    }

    /// The variable counted as the subject: the first identity variable
    /// mentioned in the select template, else its first variable.
    fn subject_variable(&self, select: &str) -> String {
        let vars: Vec<&str> = self
            .variable
            .captures_iter(select)
            .map(|c| c.get(1).map_or("", |m| m.as_str()))
            .collect();
        for candidate in IDENTITY_VARIABLES {
            if vars.contains(candidate) {
                return (*candidate).to_string();
            }
        }
        vars.first().unwrap_or(&"item").to_string()
    }

    /// The variable pages are ordered by, if the select template exposes
    /// one of the known title variables.
    fn order_variable(&self, select: &str) -> Option<&'static str> {
        let vars: Vec<&str> = self
            .variable
            .captures_iter(select)
            .map(|c| c.get(1).map_or("", |m| m.as_str()))
            .collect();
        TITLE_VARIABLES
            .iter()
            .find(|candidate| vars.contains(*candidate))
            .copied()
    }
}

impl Default for QueryComposer {
    fn default() -> Self {
        Self::new()
    }
}

fn prefix_block(config: &CollectionConfig) -> String {
    match &config.prefixes {
        Some(prefixes) if !prefixes.trim().is_empty() => {
            format!("{}\n", prefixes.trim_end())
        }
        _ => String::new(),
    }
}
