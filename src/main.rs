// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use rainwater_dashboard::application::metrics_poller::MetricsPoller;
use rainwater_dashboard::infrastructure::config::load_dashboard_config;
use rainwater_dashboard::infrastructure::prediction_client::HttpPredictionSource;
use rainwater_dashboard::presentation::app_state::AppState;
use rainwater_dashboard::presentation::handlers::build_router;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create prediction source (infrastructure layer)
    let source = Arc::new(HttpPredictionSource::new(
        config.poller.endpoint.clone(),
        config.poller.request_timeout(),
    )?);
    tracing::info!(endpoint = source.endpoint(), "Using prediction endpoint");

    // Create poller (application layer)
    let poller = Arc::new(MetricsPoller::new(
        source,
        config.poller.interval(),
        config.poller.event_capacity,
    ));

    let shutdown = CancellationToken::new();
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                shutdown_for_signal.cancel();
            }
            Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
        }
    });

    // Build router (presentation layer)
    let state = Arc::new(AppState::new(Arc::clone(&poller), shutdown.clone()));
    let router = build_router(state);

    let addr: SocketAddr = config
        .server
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind_address))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    poller.start().await;
    tracing::info!("Starting rainwater-dashboard on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
        })
        .await?;

    poller.stop().await;
    tracing::info!("rainwater-dashboard stopped");

    Ok(())
}
