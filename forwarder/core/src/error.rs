//! Error Types
//!
//! Errors that stop the forwarder from starting or serving. Per-request
//! upstream failures are not here; they never escape a handler and are
//! described by [`crate::upstream::UpstreamError`].

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while building or running the forwarder
#[derive(Debug, Error)]
pub enum ForwarderError {
    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The upstream HTTP client could not be constructed
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The listener could not be bound
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        /// Address that was attempted
        addr: String,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// The accept loop terminated with an IO error
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}
