use std::net::SocketAddr;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{
    collection_routes, filter_routes, health_routes, item_routes, search_routes,
};
use crate::state::AppState;
use crate::{Result, WebError};

/// Bind address for the API server.
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

pub async fn start_server(config: &WebConfig, state: AppState) -> Result<()> {
    let app = Router::new()
        .merge(collection_routes())
        .merge(filter_routes())
        .merge(search_routes())
        .merge(item_routes())
        .with_state(state)
        .merge(health_routes())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| WebError::Config(format!("invalid bind address: {e}")))?;

    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(WebError::Io)?;

    axum::serve(listener, app).await.map_err(WebError::Io)?;

    Ok(())
}
