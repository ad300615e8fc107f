//! Error types for the endpoint client.

use thiserror::Error;

/// Errors that can occur while querying the remote endpoint.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// The HTTP request could not be sent
    #[error("query request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("endpoint returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body is not a valid SPARQL JSON results document
    #[error("invalid results payload: {0}")]
    InvalidResults(String),

    /// The request timed out
    #[error("query timed out")]
    Timeout,

    /// Retries were exhausted without a successful response
    #[error("too many retry attempts")]
    TooManyRetries,
}
