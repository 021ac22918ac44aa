//! MapMate server
//!
//! Serves camera-based campus localization and walking navigation over HTTP.

mod api;
mod config;
mod error;
mod localizers;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use mapmate_core::{CoordinateTransform, NavigationService, load_campus_graph_or_empty};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::ServerConfig;
use error::ServerError;
use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "mapmate-server", version, about = "Campus localization and navigation API")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "MAPMATE_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overrides the config file
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Campus graph JSON, overrides the config file
    #[arg(short, long)]
    graph: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ServerConfig::load(path)?
        }
        None => {
            info!("Using default configuration");
            ServerConfig::default()
        }
    };
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(graph) = cli.graph {
        config.graph_path = graph;
    }

    info!("MapMate v{}", env!("CARGO_PKG_VERSION"));

    // A missing or broken graph leaves the service up in degraded mode
    let graph = load_campus_graph_or_empty(&config.graph_path);
    if graph.is_empty() {
        warn!("Campus graph is empty; navigation requests will fail until reloaded");
    }
    let navigation = NavigationService::new(
        Arc::new(graph),
        CoordinateTransform::new(config.origin),
        config.navigation.clone(),
    );

    let localizers = localizers::build_registry(config.fallback.clone(), &config.localizers);
    if localizers.available().is_empty() {
        warn!("No localizer available; every /localize request returns the fallback position");
    } else {
        info!("Localizers: {}", localizers.available().join(", "));
    }

    let state = Arc::new(AppState::new(
        navigation,
        localizers,
        config.graph_path.clone(),
    ));
    let app = api::build_router(state, &config.http);

    let listener = bind_listener(config.bind).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn bind_listener(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    Ok(TcpListener::bind(addr).await?)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received");
}
