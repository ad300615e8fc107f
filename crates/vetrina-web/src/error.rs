//! Web-layer error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use vetrina_core::ServiceError;

/// Result type for web handlers.
pub type Result<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("upstream query failed: {0}")]
    Upstream(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ServiceError> for WebError {
    fn from(error: ServiceError) -> Self {
        match &error {
            ServiceError::UnknownCollection(_) | ServiceError::ItemNotFound(_) => {
                Self::NotFound(error.to_string())
            }
            ServiceError::Selection(_) => Self::BadRequest(error.to_string()),
            ServiceError::Endpoint(_) => Self::Upstream(error.to_string()),
        }
    }
}

impl WebError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Config(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetrina_core::{EndpointError, SelectionError};

    #[test]
    fn service_errors_map_to_the_right_status() {
        let cases = [
            (
                ServiceError::UnknownCollection("x".into()),
                StatusCode::NOT_FOUND,
            ),
            (ServiceError::ItemNotFound("x".into()), StatusCode::NOT_FOUND),
            (
                ServiceError::Selection(SelectionError::UnsafeIri("x".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::Endpoint(EndpointError::TooManyRetries),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (error, expected) in cases {
            let response = WebError::from(error).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
