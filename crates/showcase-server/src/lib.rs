//! Showcase HTTP server
//!
//! Serves the JSON API, the static pages and the rotating front-page feed.
//! All request handlers share one [`AppState`]: the connection pool and the
//! loaded configuration.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use showcase_core::config::Config;
use showcase_core::storage::Database;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

pub mod error;
pub mod middleware;
pub mod routes;
pub mod session;

pub use error::ApiError;
pub use routes::build_router;

/// State shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Bind the configured address and serve until Ctrl-C or SIGTERM
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let address = state.config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    let local: SocketAddr = listener.local_addr()?;
    info!(address = %local, "Server running");

    let db = state.db.clone();
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
