//! Upstream Model Server Client
//!
//! HTTP client for the Ollama server the forwarder relays to.
//!
//! # Ollama API
//!
//! Only two endpoints are used:
//! - `/api/generate` - Generate a completion (always requested non-streaming by surfaces)
//! - `/api/tags` - List available models
//!
//! Response bodies are returned as raw bytes. The forwarder does not
//! interpret them, so fields this crate has never heard of reach the
//! surface unchanged.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::UpstreamConfig;

/// Why an upstream call failed
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection refused, DNS failure, timeout, or a broken body
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Ollama returned {status}: {body}")]
    Status {
        /// The HTTP status returned
        status: StatusCode,
        /// Response body, for logs only
        body: String,
    },
}

/// The two upstream operations the router needs
///
/// Implemented by [`UpstreamClient`] for real traffic; tests may substitute
/// an in-process fake.
#[async_trait]
pub trait ModelServer: Send + Sync {
    /// Forward a generate request body and return the upstream body
    async fn generate(&self, body: &serde_json::Value) -> Result<Bytes, UpstreamError>;

    /// Fetch the model listing and return the upstream body
    async fn tags(&self) -> Result<Bytes, UpstreamError>;
}

/// Ollama HTTP client
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    /// Base URL, e.g. `http://localhost:11434`
    base_url: String,
    /// HTTP client (pooled connections)
    http_client: reqwest::Client,
}

impl UpstreamClient {
    /// Create a client for the configured upstream
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. TLS backend
    /// initialisation failure).
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: config.base_url(),
            http_client: builder.build()?,
        })
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get generate endpoint URL
    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    /// Get tags endpoint URL
    fn tags_url(&self) -> String {
        format!("{}/api/tags", self.base_url)
    }

    /// Turn a response into its body, treating non-2xx as failure
    async fn read_body(response: reqwest::Response) -> Result<Bytes, UpstreamError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, body });
        }
        Ok(response.bytes().await?)
    }
}

#[async_trait]
impl ModelServer for UpstreamClient {
    async fn generate(&self, body: &serde_json::Value) -> Result<Bytes, UpstreamError> {
        let response = self
            .http_client
            .post(self.generate_url())
            .json(body)
            .send()
            .await?;

        Self::read_body(response).await
    }

    async fn tags(&self) -> Result<Bytes, UpstreamError> {
        let response = self.http_client.get(self.tags_url()).send().await?;

        Self::read_body(response).await
    }
}
