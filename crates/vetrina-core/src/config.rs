//! Typed model of a collection's facet and query configuration.
//!
//! A collection declares how to query its remote endpoint: an optional
//! prefix block, a card template (select clause, base graph pattern, page
//! size), and an ordered list of facet definitions. The declaration order
//! of facets is significant: it fixes both the order fragments are spliced
//! into composed queries and the order facets are listed to clients.

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::facet::variable_name;
use crate::locale::Locale;

const DEFAULT_PAGE_SIZE: usize = 24;

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// One collection's query configuration, immutable after load.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionConfig {
    /// Remote SPARQL endpoint answering this collection's queries
    #[serde(default)]
    pub endpoint: String,

    /// PREFIX block prepended verbatim to every composed query
    #[serde(default)]
    pub prefixes: Option<String>,

    #[serde(default)]
    pub card_template: CardTemplate,

    /// Facet definitions, in display and composition order
    #[serde(default)]
    pub facets: Vec<FacetDef>,

    /// Overview metadata, passed through untouched
    #[serde(default)]
    pub overview: serde_json::Value,

    /// Visualization metadata, passed through untouched
    #[serde(default)]
    pub visualizations: serde_json::Value,
}

/// Template for the paginated result cards.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardTemplate {
    /// Projection of the page query, e.g. `?item ?title ?summary`
    #[serde(default)]
    pub select: String,

    /// Base graph pattern, without the enclosing `WHERE { }` braces
    #[serde(default, rename = "where")]
    pub where_pattern: String,

    /// Cards per page
    #[serde(default = "default_page_size")]
    pub limit: usize,
}

impl Default for CardTemplate {
    fn default() -> Self {
        Self {
            select: String::new(),
            where_pattern: String::new(),
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One user-selectable filter dimension.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetDef {
    /// Unique key within the collection
    pub key: String,

    /// Display labels keyed by locale code
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    #[serde(flatten)]
    pub kind: FacetKind,
}

/// The closed set of facet kinds. Adding a kind is a compile-time-checked
/// change: every match over this enum is exhaustive.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FacetKind {
    /// Multi-select over a queried list of options
    #[serde(rename_all = "camelCase")]
    Checkbox {
        /// Query producing `?label` / `?uri` option pairs
        options_query: String,
        /// Triples spliced into the WHERE pattern when the facet is selected
        #[serde(default)]
        graph_fragment: Option<String>,
        /// Variable the selected values are bound to
        bind_variable: String,
        value_kind: ValueKind,
    },

    /// Numeric year range over two date variables
    #[serde(rename_all = "camelCase")]
    Range {
        /// Query producing `?min` / `?max` bounds
        range_query: String,
        #[serde(default)]
        graph_fragment: Option<String>,
        /// Variable holding the start date of an item
        begin_variable: String,
        /// Variable holding the end date of an item
        end_variable: String,
    },
}

/// How checkbox values are embedded in query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Uri,
    Literal,
}

impl CollectionConfig {
    /// Parse and fully validate a configuration document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every invariant the composer relies on. Either the whole
    /// configuration is usable or none of it is.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingField("endpoint"));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }
        if self.card_template.select.trim().is_empty() {
            return Err(ConfigError::MissingField("cardTemplate.select"));
        }
        if self.card_template.where_pattern.trim().is_empty() {
            return Err(ConfigError::MissingField("cardTemplate.where"));
        }
        if self.card_template.limit == 0 {
            return Err(ConfigError::InvalidPageSize);
        }

        let mut seen = HashSet::new();
        for facet in &self.facets {
            if facet.key.trim().is_empty() {
                return Err(ConfigError::Facet {
                    key: facet.key.clone(),
                    problem: "key must not be empty".into(),
                });
            }
            if !seen.insert(facet.key.as_str()) {
                return Err(ConfigError::DuplicateFacetKey(facet.key.clone()));
            }
            facet.validate()?;
        }
        Ok(())
    }
}

impl FacetDef {
    fn validate(&self) -> Result<(), ConfigError> {
        let problem = match &self.kind {
            FacetKind::Checkbox {
                options_query,
                bind_variable,
                ..
            } => {
                if options_query.trim().is_empty() {
                    Some("optionsQuery must not be empty")
                } else if variable_name(bind_variable).is_empty() {
                    Some("bindVariable must not be empty")
                } else {
                    None
                }
            }
            FacetKind::Range {
                range_query,
                begin_variable,
                end_variable,
                ..
            } => {
                if range_query.trim().is_empty() {
                    Some("rangeQuery must not be empty")
                } else if variable_name(begin_variable).is_empty()
                    || variable_name(end_variable).is_empty()
                {
                    Some("beginVariable and endVariable must not be empty")
                } else {
                    None
                }
            }
        };

        match problem {
            Some(problem) => Err(ConfigError::Facet {
                key: self.key.clone(),
                problem: problem.into(),
            }),
            None => Ok(()),
        }
    }

    /// Display label for a locale, falling back to Italian, then to the key.
    pub fn label_for(&self, locale: Locale) -> &str {
        self.labels
            .get(locale.code())
            .or_else(|| self.labels.get(Locale::Italian.code()))
            .map(String::as_str)
            .unwrap_or(&self.key)
    }

    /// Kind name as exposed in the filters listing.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            FacetKind::Checkbox { .. } => "checkbox",
            FacetKind::Range { .. } => "range",
        }
    }
}
