mod config;
mod routes;

use std::sync::Arc;

use anyhow::Context;
use restyler_core::{FetchConfig, Fetcher, Restyler};
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::ServerConfig;
use crate::routes::AppState;

const DEFAULT_FILTER: &str = "restyler_server=info,restyler_core=info,tower_http=info";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    fmt().with_env_filter(env_filter).init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ServerConfig::from_env().context("Failed to load server configuration")?;
    let fetcher = Fetcher::new(FetchConfig { timeout: config.fetch_timeout, ..FetchConfig::default() })
        .context("Failed to build HTTP client")?;
    let state = Arc::new(AppState { restyler: Restyler::new(), fetcher });

    let listener = TcpListener::bind(config.addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.addr()))?;
    tracing::info!(
        addr = %listener.local_addr()?,
        static_dir = %config.static_dir.display(),
        "restyler server listening"
    );

    axum::serve(listener, routes::app(state, &config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
