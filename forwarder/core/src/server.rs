//! Forwarder Server
//!
//! Binds the listener and runs the router until a shutdown future resolves.
//! Binding is separate from serving so callers (and tests) can learn the
//! real address when port 0 was requested.

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::ForwarderConfig;
use crate::error::ForwarderError;
use crate::routes::{build_router, AppState};
use crate::upstream::UpstreamClient;

/// A bound forwarder, ready to serve
pub struct ForwarderServer {
    listener: TcpListener,
    state: AppState,
    upstream_url: String,
}

impl ForwarderServer {
    /// Validate config, build the upstream client, and bind the listener
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration, HTTP client construction failure, or
    /// when the listen address cannot be bound.
    pub async fn bind(config: &ForwarderConfig) -> Result<Self, ForwarderError> {
        config.validate()?;

        let upstream = UpstreamClient::new(&config.upstream)?;
        let upstream_url = upstream.base_url().to_string();

        let addr = config.server.bind_address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ForwarderError::Bind { addr, source })?;

        Ok(Self {
            listener,
            state: AppState::from(upstream),
            upstream_url,
        })
    }

    /// Bind with a caller-supplied upstream (used by tests and embedders)
    ///
    /// # Errors
    ///
    /// Fails when the listen address cannot be bound.
    pub async fn bind_with_state(
        config: &ForwarderConfig,
        state: AppState,
    ) -> Result<Self, ForwarderError> {
        let addr = config.server.bind_address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ForwarderError::Bind { addr, source })?;

        Ok(Self {
            listener,
            state,
            upstream_url: config.upstream.base_url(),
        })
    }

    /// The address actually bound
    ///
    /// # Errors
    ///
    /// Propagates the OS error if the socket address cannot be queried.
    pub fn local_addr(&self) -> Result<SocketAddr, ForwarderError> {
        self.listener.local_addr().map_err(ForwarderError::Serve)
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests
    ///
    /// # Errors
    ///
    /// Returns an error if the accept loop fails.
    pub async fn run<F>(self, shutdown: F) -> Result<(), ForwarderError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = self.listener.local_addr() {
            info!(
                addr = %addr,
                upstream = %self.upstream_url,
                "Proxy server running on http://{addr}"
            );
        }

        axum::serve(self.listener, build_router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ForwarderError::Serve)?;

        info!("Forwarder stopped");
        Ok(())
    }
}
