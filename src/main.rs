//! Strictly Rooms - server binary.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use strictly_rooms::api::{self, AppState};
use strictly_rooms::{GameService, ServerConfig};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => run_server(config, host, port).await,
    }
}

/// Run the HTTP and WebSocket room server
#[instrument(skip_all)]
async fn run_server(config: Option<PathBuf>, host: Option<String>, port: Option<u16>) -> Result<()> {
    // Scoped subscriber so config loading is logged before the configured
    // filter is known.
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(env_filter(ServerConfig::default().log_filter()))
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, || {
        ServerConfig::load(config.as_deref()).map(|loaded| loaded.with_overrides(host, port))
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config.log_filter()))
        .init();
    info!(
        addr = %config.bind_addr(),
        subscriber_buffer = config.subscriber_buffer(),
        "Configuration applied"
    );

    let state = AppState::new(GameService::default(), *config.subscriber_buffer());
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "Server ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured filter.
fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
