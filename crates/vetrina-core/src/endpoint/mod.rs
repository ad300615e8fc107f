//! Thin execution client for the remote SPARQL endpoint.

mod client;
mod config;
mod error;
mod results;

pub use client::EndpointClient;
pub use config::{ClientConfig, RetryConfig};
pub use error::EndpointError;
pub use results::Binding;

pub(crate) use results::parse_results;
