//! Error types for Poller operations

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while setting up or running the Poller
#[derive(Error, Debug)]
pub enum PollerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Extractor setup error
    #[error("Extractor error: {0}")]
    Extractor(#[from] tagwatch_extractor::ExtractorError),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}

/// Why a fetch produced no body this cycle
#[derive(Error, Debug)]
pub enum FetchError {
    /// No response within the fetch timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Response status other than 200
    #[error("Failed to fetch page: HTTP {0}")]
    Status(u16),

    /// Connection, protocol or body decoding failure
    #[error("Request failed: {0}")]
    Request(String),
}
