//! Tagwatch Server
//!
//! Serves stored tag entries over HTTP while the poller runs in the background.
//!
//! # Routes
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | `{"message": "Welcome to the Page Monitor API!"}` |
//! | `GET /content` | JSON array of `{id, content, timestamp}`, or 404 `{"detail": "No content found"}` |

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod query;

use config::ServerConfig;
use handlers::{create_router, AppState};
use tagwatch_poller::{PollerError, PollerWorker};
use tagwatch_store::{SharedStore, SqliteStore, StoreError};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Database could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Poller could not be built or stopped cleanly
    #[error("Poller error: {0}")]
    Poller(#[from] PollerError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the poller and the HTTP server
///
/// Opens the store, spawns the poller, and serves requests until Ctrl+C.
/// The poller is stopped after the server has drained.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting Tagwatch");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.database_path.display());
    info!("Monitoring: {}", config.poller.monitored_url);

    let store = SharedStore::new(SqliteStore::open(
        &config.database_path,
        config.poller.dedup_mode,
    )?);

    let poller = PollerWorker::from_config(&config.poller, store.clone())?.start();

    let app = create_router(AppState { store });

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(poller.shutdown_token()))
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    let metrics = poller.stop().await?;
    info!("Tagwatch stopped after {} poll cycles", metrics.cycle_count);

    Ok(())
}

/// Resolves on Ctrl+C or when the poller's token is cancelled elsewhere
async fn shutdown_signal(token: CancellationToken) {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("Shutdown signal received"),
        _ = token.cancelled() => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config() {
        let config = ServerConfig::default_config();
        assert_eq!(config.bind_port, 8000);
        assert!(config.poller.validate().is_ok());
    }
}
