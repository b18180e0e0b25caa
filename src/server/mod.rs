//! HTTP server module
//!
//! Provides the Axum-based HTTP server for serving metrics.

pub mod handlers;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Router};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::collector::{Collector, ConnectClient};
use crate::config::Config;
use crate::metrics::Descriptors;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Scrape cycle runner
    pub collector: Arc<Collector>,
}

impl AppState {
    /// Build the collector from a validated configuration.
    ///
    /// Metric descriptors are created here, once per process.
    pub fn from_config(config: Config) -> Result<Self> {
        let url = config.connect.parsed_url()?;
        let client = ConnectClient::new(&url, config.connect.timeout())?;
        let collector = Collector::new(
            client,
            Descriptors::default(),
            config.connect.failure_policy,
        );

        Ok(Self {
            config: Arc::new(config),
            collector: Arc::new(collector),
        })
    }
}

/// Build the router: `/`, `/health` and the configured metrics path
pub fn router(state: AppState) -> Router {
    let metrics_path = state.config.server.path.clone();

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route(&metrics_path, get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Parse the configured bind address.
/// Handles "localhost" specially, otherwise parses as IP address.
fn bind_addr(bind_address: &str, port: u16) -> Result<SocketAddr> {
    let ip: IpAddr = if bind_address == "localhost" {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    } else {
        bind_address.parse().map_err(|e| {
            anyhow::anyhow!(
                "Invalid bind_address '{}': {}. Use an IP address (e.g., '0.0.0.0', '127.0.0.1') or 'localhost'.",
                bind_address,
                e
            )
        })?
    };

    Ok(SocketAddr::from((ip, port)))
}

/// Run the HTTP server until Ctrl+C / SIGTERM
///
/// # Errors
/// Returns an error if the collector cannot be built or the server fails to start
pub async fn run(config: Config) -> Result<()> {
    let addr = bind_addr(&config.server.bind_address, config.server.port)?;
    let metrics_path = config.server.path.clone();

    let app = router(AppState::from_config(config)?);

    info!(address = %addr, metrics_path = %metrics_path, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
