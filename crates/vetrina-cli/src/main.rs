use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use vetrina_core::{CatalogueService, CollectionRegistry, EndpointClient};
use vetrina_web::{start_server, AppState, WebConfig};

#[derive(Debug, Parser)]
#[command(name = "vetrina", version, about = "Faceted catalogue gateway over SPARQL endpoints")]
struct Cli {
    /// Directory holding collections.json and per-collection configs
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Address to bind the API server to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the API server to
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = format!(
        "vetrina_core={log_level},vetrina_web={log_level},vetrina_cli={log_level}"
    );
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .init();

    let registry = CollectionRegistry::load(&cli.data_dir)
        .with_context(|| format!("loading collections from {}", cli.data_dir.display()))?;
    info!(collections = registry.entries().len(), "registry loaded");

    let client = EndpointClient::new().context("building endpoint client")?;
    let service = CatalogueService::new(Arc::new(registry), client);

    let config = WebConfig {
        host: cli.host,
        port: cli.port,
    };
    let state = AppState {
        service: Arc::new(service),
    };
    start_server(&config, state).await?;

    Ok(())
}
