//! Tagsim Server
//!
//! Runs the simulated tag server core until Ctrl+C or SIGTERM.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use tagsim::logging::init_tracing;
use tagsim::{DataServer, ServerConfig};

/// Simulated tag data server
#[derive(Parser, Debug)]
#[command(name = "tagsim")]
#[command(about = "Simulated tag data server", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long)]
    log_level: Option<String>,

    /// Don't start the simulation loop
    #[arg(long)]
    no_simulation: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(level) = args.log_level {
        config.log.level = level;
    }
    if args.no_simulation {
        config.simulation.enabled = false;
    }
    config.validate()?;

    init_tracing(&config.log)?;
    info!("Starting tagsim v{}", env!("CARGO_PKG_VERSION"));

    let server = DataServer::initialize(config).context("Failed to build address space")?;
    info!(
        "Serving {} items ({} property definitions)",
        server.registry().len(),
        server.catalog().len()
    );

    shutdown_signal().await;

    server.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down...");
        },
    }
}
