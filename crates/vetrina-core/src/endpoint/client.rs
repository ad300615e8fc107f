//! HTTP client for the remote SPARQL endpoint.

use reqwest::header::ACCEPT;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::config::{ClientConfig, RetryConfig};
use super::error::EndpointError;
use super::results::{parse_results, Binding};

const RESULTS_MEDIA_TYPE: &str = "application/sparql-results+json";

/// Client for read-only queries against SPARQL endpoints.
///
/// Queries are idempotent reads, so transient failures (transport errors,
/// timeouts, 5xx, 429) are retried with bounded exponential backoff.
#[derive(Clone)]
pub struct EndpointClient {
    client: reqwest::Client,
    retry: RetryConfig,
}

impl EndpointClient {
    /// Create a client with default configuration.
    pub fn new() -> Result<Self, EndpointError> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self, EndpointError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()
            .map_err(EndpointError::Request)?;

        Ok(Self {
            client,
            retry: config.retry,
        })
    }

    /// Run a query against `endpoint` and return the result rows.
    pub async fn select(
        &self,
        endpoint: &str,
        query: &str,
    ) -> Result<Vec<Binding>, EndpointError> {
        debug!(endpoint, bytes = query.len(), "running query");
        self.retry_request(|| self.run_query(endpoint, query)).await
    }

    async fn run_query(&self, endpoint: &str, query: &str) -> Result<Vec<Binding>, EndpointError> {
        let response = self
            .client
            .get(endpoint)
            .query(&[("query", query)])
            .header(ACCEPT, RESULTS_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EndpointError::Timeout
                } else {
                    EndpointError::Request(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EndpointError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(EndpointError::Request)?;
        parse_results(&body)
    }

    /// Retry a request with exponential backoff.
    async fn retry_request<F, Fut>(&self, request_fn: F) -> Result<Vec<Binding>, EndpointError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<Vec<Binding>, EndpointError>>,
    {
        let mut attempts = 0;
        let mut delay = self.retry.initial_backoff;

        loop {
            match request_fn().await {
                Ok(rows) => {
                    if attempts > 0 {
                        debug!("query succeeded after {} retries", attempts);
                    }
                    return Ok(rows);
                }
                Err(error) => {
                    attempts += 1;

                    if !is_retriable(&error) {
                        return Err(error);
                    }
                    if attempts > self.retry.max_retries {
                        warn!(
                            "query failed after {} attempts: {}",
                            attempts, error
                        );
                        return Err(EndpointError::TooManyRetries);
                    }

                    warn!(
                        "query failed (attempt {}/{}), retrying in {:?}: {}",
                        attempts, self.retry.max_retries, delay, error
                    );
                    sleep(delay).await;
                    delay = std::cmp::min(delay * 2, self.retry.max_backoff);
                }
            }
        }
    }
}

fn is_retriable(error: &EndpointError) -> bool {
    match error {
        EndpointError::Request(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        EndpointError::Timeout => true,
        // 5xx and rate limiting are worth another attempt
        EndpointError::Http { status, .. } => *status >= 500 || *status == 429,
        EndpointError::InvalidResults(_) | EndpointError::TooManyRetries => false,
    }
}
