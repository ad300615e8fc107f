//! Endpoint client tests against a mock SPARQL endpoint.

use std::time::Duration;

use vetrina_core::{ClientConfig, EndpointClient, EndpointError, RetryConfig};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESULTS_MEDIA_TYPE: &str = "application/sparql-results+json";

fn results_body(rows: &[serde_json::Value]) -> String {
    serde_json::json!({ "results": { "bindings": rows } }).to_string()
}

fn quick_retry_client(max_retries: u32) -> EndpointClient {
    EndpointClient::with_config(ClientConfig {
        retry: RetryConfig {
            max_retries,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(5),
        },
        ..ClientConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn select_sends_the_query_and_parses_bindings() {
    let server = MockServer::start().await;
    let body = results_body(&[serde_json::json!({
        "item": { "type": "uri", "value": "http://example.org/1" },
        "title": { "type": "literal", "value": "Anfora" }
    })]);
    Mock::given(method("GET"))
        .and(path("/sparql"))
        .and(header("accept", RESULTS_MEDIA_TYPE))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, RESULTS_MEDIA_TYPE))
        .expect(1)
        .mount(&server)
        .await;

    let client = EndpointClient::new().unwrap();
    let endpoint = format!("{}/sparql", server.uri());
    let rows = client.select(&endpoint, "SELECT ?item WHERE { }").await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("item"), Some("http://example.org/1"));

    let requests = server.received_requests().await.unwrap();
    let query = requests[0]
        .url
        .query_pairs()
        .find(|(k, _)| k == "query")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    assert_eq!(query, "SELECT ?item WHERE { }");
}

#[tokio::test]
async fn non_success_status_is_reported_with_its_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such dataset"))
        .expect(1)
        .mount(&server)
        .await;

    let client = quick_retry_client(3);
    let err = client.select(&server.uri(), "SELECT * WHERE { }").await.unwrap_err();
    match err {
        EndpointError::Http { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "no such dataset");
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_payload_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>surprise</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = quick_retry_client(3);
    let err = client.select(&server.uri(), "SELECT * WHERE { }").await.unwrap_err();
    assert!(matches!(err, EndpointError::InvalidResults(_)));
}

#[tokio::test]
async fn server_errors_are_retried_until_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(2)
        .mount(&server)
        .await;

    let client = quick_retry_client(1);
    let err = client.select(&server.uri(), "SELECT * WHERE { }").await.unwrap_err();
    assert!(matches!(err, EndpointError::TooManyRetries));
}

#[tokio::test]
async fn transient_server_error_recovers_on_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(results_body(&[]), RESULTS_MEDIA_TYPE),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = quick_retry_client(2);
    let rows = client.select(&server.uri(), "SELECT * WHERE { }").await.unwrap();
    assert!(rows.is_empty());
}
