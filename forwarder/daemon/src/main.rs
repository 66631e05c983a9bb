//! Forwarder Daemon
//!
//! Stateless HTTP relay between chat surfaces and a local Ollama server.
//!
//! # Usage
//!
//! ```bash
//! # Listen on 127.0.0.1:3001, relay to localhost:11434
//! forwarder-daemon
//!
//! # Relay to Ollama on another machine
//! forwarder-daemon --ollama-host gpu-box --ollama-port 11434
//!
//! # With verbose logging
//! RUST_LOG=debug forwarder-daemon
//! ```
//!
//! # Environment Variables
//!
//! - `FORWARDER_CONFIG`: Path to a TOML config file
//! - `FORWARDER_HOST` / `FORWARDER_PORT`: Listen address
//! - `OLLAMA_HOST` / `OLLAMA_PORT`: Upstream Ollama address (`OLLAMA_HOST` may be
//!   `host`, `host:port`, or `http://host:port`; `OLLAMA_PORT` wins over its port)
//! - `FORWARDER_UPSTREAM_TIMEOUT_SECS`: Upstream request timeout (0 = none)
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)
//!
//! # Signals
//!
//! - SIGTERM/SIGINT: Graceful shutdown (in-flight requests are drained)

use std::path::PathBuf;

use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use forwarder_core::config::{self, ConfigOverrides};
use forwarder_core::ForwarderServer;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "forwarder-daemon", version, about)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = "FORWARDER_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (0 picks a free port)
    #[arg(long)]
    port: Option<u16>,

    /// Ollama host
    #[arg(long)]
    ollama_host: Option<String>,

    /// Ollama port
    #[arg(long)]
    ollama_port: Option<u16>,

    /// Upstream request timeout in seconds (0 = no timeout)
    #[arg(long)]
    upstream_timeout_secs: Option<u64>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            upstream_host: self.ollama_host.clone(),
            upstream_port: self.ollama_port,
            upstream_timeout_secs: self.upstream_timeout_secs,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("forwarder_daemon=info".parse()?)
                .add_directive("forwarder_core=info".parse()?),
        )
        .with_target(true)
        .init();

    info!("Starting Forwarder Daemon");

    let config_path = cli.config.clone().or_else(config::default_config_path);
    let mut config = config::load_config_from_path(config_path).map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;
    config.apply_overrides(&cli.overrides());

    info!(
        listen = %config.server.bind_address(),
        upstream = %config.upstream.base_url(),
        source = %config.source(),
        "Configuration resolved"
    );

    let server = ForwarderServer::bind(&config).await.map_err(|e| {
        error!(error = %e, "Failed to start server");
        anyhow::anyhow!(
            "{e}. Check whether another forwarder is already running on {}.",
            config.server.bind_address()
        )
    })?;

    server.run(shutdown_signal()).await?;

    info!("Forwarder daemon stopped cleanly");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}
