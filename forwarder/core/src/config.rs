//! Configuration
//!
//! The forwarder listens on one address and relays to one upstream. Both
//! used to be hard-coded; they are now explicit inputs so the daemon can be
//! pointed at a mock upstream in tests or at a remote Ollama in deployment.
//!
//! # Configuration Priority
//!
//! Values are resolved with the following priority (highest first):
//! 1. CLI arguments ([`ConfigOverrides`], applied by the daemon)
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 3001
//!
//! [upstream]
//! host = "localhost"
//! port = 11434
//! timeout_secs = 300
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default listen host
pub const DEFAULT_LISTEN_HOST: &str = "127.0.0.1";
/// Default listen port
pub const DEFAULT_LISTEN_PORT: u16 = 3001;
/// Default upstream host
pub const DEFAULT_UPSTREAM_HOST: &str = "localhost";
/// Default upstream port (Ollama's)
pub const DEFAULT_UPSTREAM_PORT: u16 = 11434;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[server]` section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerToml {
    /// Listen host
    pub host: Option<String>,
    /// Listen port
    pub port: Option<u16>,
}

/// `[upstream]` section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamToml {
    /// Ollama host
    pub host: Option<String>,
    /// Ollama port
    pub port: Option<u16>,
    /// Whole-request timeout in seconds (unset = no timeout)
    pub timeout_secs: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwarderToml {
    /// Listener section
    pub server: ServerToml,
    /// Upstream section
    pub upstream: UpstreamToml,
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Where the forwarder listens
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen host (IP literal or resolvable name)
    pub host: String,
    /// Listen port (0 picks an ephemeral port)
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_LISTEN_HOST.to_string(),
            port: DEFAULT_LISTEN_PORT,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parse as a socket address when the host is an IP literal
    #[must_use]
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.bind_address().parse().ok()
    }
}

/// Where the upstream model server lives
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Whole-request timeout; `None` keeps the HTTP client's default
    pub timeout: Option<Duration>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_UPSTREAM_HOST.to_string(),
            port: DEFAULT_UPSTREAM_PORT,
            timeout: None,
        }
    }
}

impl UpstreamConfig {
    /// Create an upstream config without a timeout override
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: None,
        }
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Fully resolved forwarder configuration
#[derive(Clone, Debug)]
pub struct ForwarderConfig {
    /// Listener settings
    pub server: ServerConfig,
    /// Upstream settings
    pub upstream: UpstreamConfig,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    /// Highest-priority source that contributed a value
    source: ConfigSource,
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl ForwarderConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the highest-priority source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Apply command-line overrides (highest priority)
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        let mut touched = false;
        if let Some(ref host) = overrides.host {
            self.server.host.clone_from(host);
            touched = true;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
            touched = true;
        }
        if let Some(ref host) = overrides.upstream_host {
            self.upstream.host.clone_from(host);
            touched = true;
        }
        if let Some(port) = overrides.upstream_port {
            self.upstream.port = port;
            touched = true;
        }
        if let Some(secs) = overrides.upstream_timeout_secs {
            self.upstream.timeout = timeout_from_secs(secs);
            touched = true;
        }
        if touched {
            self.source = ConfigSource::Cli;
        }
    }

    /// Check values that would only fail later at bind or request time
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for empty hosts, an upstream
    /// host carrying a scheme or port, or a zero upstream port.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host must not be empty".to_string(),
            ));
        }
        if self.upstream.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "upstream.host must not be empty".to_string(),
            ));
        }
        if self.upstream.host.contains(':') || self.upstream.host.contains('/') {
            return Err(ConfigError::ValidationError(format!(
                "upstream.host {:?} must be a bare host name; set the port separately",
                self.upstream.host
            )));
        }
        if self.upstream.port == 0 {
            return Err(ConfigError::ValidationError(
                "upstream.port must not be 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Command-line overrides, applied after file and environment
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Listen host
    pub host: Option<String>,
    /// Listen port
    pub port: Option<u16>,
    /// Upstream host
    pub upstream_host: Option<String>,
    /// Upstream port
    pub upstream_port: Option<u16>,
    /// Upstream timeout in seconds (0 = none)
    pub upstream_timeout_secs: Option<u64>,
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/ollama-chat/forwarder.toml` or
/// `~/.config/ollama-chat/forwarder.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ollama-chat").join("forwarder.toml"))
}

/// Load configuration from the default path and the process environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<ForwarderConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path and the process environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<ForwarderConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration using a custom environment lookup
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or if an environment variable holds an unparseable number.
pub fn load_config_with_env<F>(path: Option<PathBuf>, env: F) -> Result<ForwarderConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ForwarderConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: ForwarderToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env)?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut ForwarderConfig, toml: &ForwarderToml) {
    if let Some(ref host) = toml.server.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = toml.server.port {
        config.server.port = port;
    }
    if let Some(ref host) = toml.upstream.host {
        config.upstream.host.clone_from(host);
    }
    if let Some(port) = toml.upstream.port {
        config.upstream.port = port;
    }
    if let Some(secs) = toml.upstream.timeout_secs {
        config.upstream.timeout = timeout_from_secs(secs);
    }
}

/// Apply environment variable overrides
fn apply_env_config<F>(config: &mut ForwarderConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut touched = false;

    if let Some(host) = env("FORWARDER_HOST") {
        config.server.host = host;
        touched = true;
    }
    if let Some(port) = env("FORWARDER_PORT") {
        config.server.port = parse_env("FORWARDER_PORT", &port)?;
        touched = true;
    }
    if let Some(value) = env("OLLAMA_HOST") {
        let (host, port) = parse_ollama_host(&value)?;
        config.upstream.host = host;
        if let Some(port) = port {
            config.upstream.port = port;
        }
        touched = true;
    }
    if let Some(port) = env("OLLAMA_PORT") {
        config.upstream.port = parse_env("OLLAMA_PORT", &port)?;
        touched = true;
    }
    if let Some(secs) = env("FORWARDER_UPSTREAM_TIMEOUT_SECS") {
        let secs: u64 = parse_env("FORWARDER_UPSTREAM_TIMEOUT_SECS", &secs)?;
        config.upstream.timeout = timeout_from_secs(secs);
        touched = true;
    }

    if touched {
        config.source = ConfigSource::Env;
    }
    Ok(())
}

/// Split `OLLAMA_HOST` the way Ollama itself reads it
///
/// Accepts `host`, `host:port`, and either form behind `http://`. A port
/// given here is overridden by `OLLAMA_PORT`.
fn parse_ollama_host(value: &str) -> Result<(String, Option<u16>), ConfigError> {
    let trimmed = value.trim();
    let without_scheme = match trimmed.split_once("://") {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("http") => rest,
        Some((scheme, _)) => {
            return Err(ConfigError::ValidationError(format!(
                "OLLAMA_HOST={value:?} uses unsupported scheme {scheme:?}; only http is supported"
            )))
        }
        None => trimmed,
    };
    let authority = without_scheme.trim_end_matches('/');

    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => (host, Some(parse_env::<u16>("OLLAMA_HOST", port)?)),
        None => (authority, None),
    };

    if host.is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "OLLAMA_HOST={value:?} has no host"
        )));
    }
    Ok((host.to_string(), port))
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::ValidationError(format!("{key}={value:?} is not a valid number")))
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_match_fixed_addresses() {
        let config = load_config_with_env(None, no_env).unwrap();
        assert_eq!(config.server.bind_address(), "127.0.0.1:3001");
        assert_eq!(config.upstream.base_url(), "http://localhost:11434");
        assert_eq!(config.upstream.timeout, None);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let path = PathBuf::from("/nonexistent/ollama-chat/forwarder.toml");
        let config = load_config_with_env(Some(path), no_env).unwrap();
        assert!(config.config_file_path.is_none());
        assert_eq!(config.server.port, DEFAULT_LISTEN_PORT);
    }

    #[test]
    fn test_file_values_applied() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nport = 4000\n\n[upstream]\nhost = \"gpu-box\"\ntimeout_secs = 30"
        )
        .unwrap();

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.server.host, DEFAULT_LISTEN_HOST);
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.upstream.host, "gpu-box");
        assert_eq!(config.upstream.port, DEFAULT_UPSTREAM_PORT);
        assert_eq!(config.upstream.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.source(), ConfigSource::File);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[upstream]\nhost = \"from-file\"\nport = 1234").unwrap();

        let env: HashMap<&str, &str> = [("OLLAMA_HOST", "from-env")].into_iter().collect();
        let config = load_config_with_env(Some(file.path().to_path_buf()), |k| {
            env.get(k).map(|v| (*v).to_string())
        })
        .unwrap();

        assert_eq!(config.upstream.host, "from-env");
        assert_eq!(config.upstream.port, 1234);
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_bad_env_number_is_an_error() {
        let result = load_config_with_env(None, |k| {
            (k == "FORWARDER_PORT").then(|| "not-a-port".to_string())
        });
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_cli_overrides_env() {
        let mut config =
            load_config_with_env(None, |k| (k == "FORWARDER_PORT").then(|| "5000".to_string()))
                .unwrap();
        assert_eq!(config.server.port, 5000);

        config.apply_overrides(&ConfigOverrides {
            port: Some(6000),
            upstream_timeout_secs: Some(0),
            ..Default::default()
        });
        assert_eq!(config.server.port, 6000);
        assert_eq!(config.upstream.timeout, None);
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_empty_overrides_keep_source() {
        let mut config = ForwarderConfig::new();
        config.apply_overrides(&ConfigOverrides::default());
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_validate() {
        assert!(ForwarderConfig::new().validate().is_ok());

        let mut config = ForwarderConfig::new();
        config.upstream.port = 0;
        assert!(config.validate().is_err());

        let mut config = ForwarderConfig::new();
        config.server.host = "  ".to_string();
        assert!(config.validate().is_err());

        // Ephemeral listen port is fine
        let mut config = ForwarderConfig::new();
        config.server.port = 0;
        assert!(config.validate().is_ok());
    }

    fn with_ollama_host(value: &str) -> Result<ForwarderConfig, ConfigError> {
        let value = value.to_string();
        load_config_with_env(None, move |k| (k == "OLLAMA_HOST").then(|| value.clone()))
    }

    #[test]
    fn test_ollama_host_accepted_forms() {
        let cases = [
            ("gpu-box", "http://gpu-box:11434"),
            ("127.0.0.1:11434", "http://127.0.0.1:11434"),
            ("0.0.0.0:8080", "http://0.0.0.0:8080"),
            ("http://127.0.0.1:11434", "http://127.0.0.1:11434"),
            ("HTTP://gpu-box/", "http://gpu-box:11434"),
        ];
        for (value, expected) in cases {
            let config = with_ollama_host(value).unwrap();
            assert!(config.validate().is_ok(), "{value} should validate");
            assert_eq!(config.upstream.base_url(), expected, "OLLAMA_HOST={value}");
        }
    }

    #[test]
    fn test_ollama_port_wins_over_host_port() {
        let config = load_config_with_env(None, |k| match k {
            "OLLAMA_HOST" => Some("gpu-box:8080".to_string()),
            "OLLAMA_PORT" => Some("9090".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.upstream.base_url(), "http://gpu-box:9090");
    }

    #[test]
    fn test_ollama_host_rejected_forms() {
        for value in ["https://gpu-box", "gpu-box:port", ":11434", "http://", "gpu-box:99999"] {
            assert!(
                matches!(with_ollama_host(value), Err(ConfigError::ValidationError(_))),
                "OLLAMA_HOST={value} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_rejects_host_with_port_or_scheme() {
        for host in ["127.0.0.1:11434", "http://gpu-box"] {
            let mut config = ForwarderConfig::new();
            config.apply_overrides(&ConfigOverrides {
                upstream_host: Some(host.to_string()),
                ..Default::default()
            });
            assert!(
                matches!(config.validate(), Err(ConfigError::ValidationError(_))),
                "{host} should fail validation"
            );
        }
    }

    #[test]
    fn test_socket_addr() {
        assert!(ServerConfig::default().socket_addr().is_some());
        let named = ServerConfig {
            host: "localhost".to_string(),
            port: 3001,
        };
        assert!(named.socket_addr().is_none());
    }
}
