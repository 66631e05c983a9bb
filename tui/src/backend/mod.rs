//! Backend Integration
//!
//! Communication with the forwarder daemon.

mod client;

use async_trait::async_trait;

use forwarder_core::{GenerateRequest, GenerateResponse, ModelList};

pub use client::{ClientError, ForwarderClient};

/// The two calls the chat surface makes
///
/// Implemented by [`ForwarderClient`] over HTTP; tests drive the app with
/// in-memory implementations.
#[async_trait]
pub trait ChatBackend: Send + Sync + 'static {
    /// Fetch the models the server has available
    async fn list_models(&self) -> Result<ModelList, ClientError>;

    /// Run one non-streaming generation
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ClientError>;
}
