//! Forwarder Client
//!
//! HTTP client for the forwarder's two routes. Requests carry no timeout;
//! a generate call runs until the forwarder answers or the connection drops.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

use forwarder_core::{ErrorBody, GenerateRequest, GenerateResponse, ModelList};

use super::ChatBackend;
use crate::config::ClientConfig;

/// Failures talking to the forwarder
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, TLS, or body transfer failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The forwarder answered with a non-success status
    #[error("forwarder returned {status}{}", suffix(.message.as_deref()))]
    Status {
        /// HTTP status code
        status: reqwest::StatusCode,
        /// The `error` field of the body, when it had one
        message: Option<String>,
    },

    /// The body was not the expected JSON shape
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

fn suffix(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

/// Backend client
#[derive(Clone, Debug)]
pub struct ForwarderClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl ForwarderClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder().build()?;
        Ok(Self {
            config: config.clone(),
            http_client,
        })
    }

    /// Base URL requests are sent to
    pub fn forwarder_url(&self) -> &str {
        &self.config.forwarder_url
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .map(|body| body.error);
            return Err(ClientError::Status { status, message });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl ChatBackend for ForwarderClient {
    async fn list_models(&self) -> Result<ModelList, ClientError> {
        let url = self.config.tags_url();
        tracing::debug!(url = %url, "Fetching models");

        let response = self.http_client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ClientError> {
        let url = self.config.generate_url();
        tracing::debug!(url = %url, model = %request.model, "Sending generate request");

        let response = self.http_client.post(&url).json(request).send().await?;
        Self::decode(response).await
    }
}
