//! HTTP server for thermolog that records thermometer readings and serves their stats.

mod config;
mod error;
mod payload;
mod routes;

use std::future;

use anyhow::Result;
use clap::Parser;
use thermolog_core::service::ThermologService;
use thermolog_store_memory as memory;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter)?)
        .init();

    // Store + service setup
    let service = ThermologService::new(memory::ports());
    if config.demo_data {
        service.init_demo_data().await?;
    }

    let app = routes::router(service);
    let listener = TcpListener::bind(config.bind).await?;
    info!(addr = %config.bind, "Listening for HTTP requests");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        // Keep serving; the process can still be stopped by other signals.
        error!(error = %err, "Failed to listen for Ctrl-C");
        future::pending::<()>().await;
    }
    info!("Ctrl-C received, shutting down");
}
