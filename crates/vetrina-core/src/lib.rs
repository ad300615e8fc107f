//! # Vetrina core
//!
//! Query composition and facet execution engine for SPARQL-backed
//! catalogues. A collection's configuration declares a base graph pattern,
//! facet definitions, and a card template; this crate turns that plus a
//! user's facet selections into concrete count and page queries, runs them
//! against the collection's remote endpoint, and normalizes the result
//! bindings into card pages.
//!
//! The pieces, leaf first: [`config`] (typed configuration model),
//! [`locale`] (locale substitution in query templates), [`facet`] (facet
//! clause building and the value-escaping boundary), [`compose`] (query
//! assembly), [`endpoint`] (execution client), [`cards`] (result
//! normalization), [`registry`] and [`service`] (shared collection state
//! and the request-level operations).

pub mod cards;
pub mod compose;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod facet;
pub mod locale;
pub mod registry;
pub mod service;

pub use cards::{CardRecord, ResultPage};
pub use compose::{ComposedQuery, QueryComposer, QueryKind};
pub use config::{CardTemplate, CollectionConfig, FacetDef, FacetKind, ValueKind};
pub use endpoint::{Binding, ClientConfig, EndpointClient, EndpointError, RetryConfig};
pub use error::{ConfigError, SelectionError, ServiceError};
pub use facet::{Selection, SelectionValue};
pub use locale::{Locale, LocaleInjector};
pub use registry::{CollectionEntry, CollectionRegistry};
pub use service::{CatalogueService, FacetListing, FacetOption, FacetRange};
