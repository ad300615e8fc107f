//! Error types for configuration loading, selection validation, and the
//! catalogue service.

use std::path::PathBuf;
use thiserror::Error;

use crate::endpoint::EndpointError;

/// Errors raised while loading or validating collection configuration.
///
/// Validation is total: a configuration either loads completely or is
/// rejected before any query is composed from it.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document is not valid JSON or has the wrong shape
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required field is absent or empty
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The endpoint is not an absolute http(s) URL
    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    /// The page size must be at least 1
    #[error("page size must be at least 1")]
    InvalidPageSize,

    /// Two facets share the same key
    #[error("duplicate facet key: {0}")]
    DuplicateFacetKey(String),

    /// A facet definition is incomplete
    #[error("facet '{key}': {problem}")]
    Facet { key: String, problem: String },

    /// Two registry entries share the same collection id
    #[error("duplicate collection id: {0}")]
    DuplicateCollection(String),

    /// A registry entry references a config file that does not exist
    #[error("referenced config file not found: {0}")]
    MissingResource(PathBuf),

    /// Reading a configuration file failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A facet selection value failed syntactic validation.
///
/// Rejected values never reach query text; there is no silent sanitization
/// beyond the documented literal escaping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The value cannot be embedded as an IRI without breaking out of the
    /// surrounding syntax
    #[error("value '{0}' is not a safe IRI")]
    UnsafeIri(String),

    /// The selection shape does not match the facet kind
    #[error("facet '{facet}' expects a {expected} selection")]
    ShapeMismatch {
        facet: String,
        expected: &'static str,
    },
}

/// Request-level errors from the catalogue service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No collection with this id is registered
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// The item query returned no rows
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// A facet selection value was rejected before composition
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// The remote query endpoint failed
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}
