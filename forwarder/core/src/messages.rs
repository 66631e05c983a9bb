//! Wire Types
//!
//! JSON shapes exchanged between chat surfaces, the forwarder, and the
//! upstream Ollama server.
//!
//! The forwarder itself never decodes upstream responses; it relays bytes.
//! These types exist for surfaces that consume the forwarder and for the
//! forwarder's own error payloads. Every decoded type ignores fields it does
//! not know about, so upstream schema growth never breaks a client.

use serde::{Deserialize, Deserializer, Serialize};

/// Error text returned by `POST /api/generate` when the upstream call fails
pub const GENERATE_FAILED: &str = "Failed to generate response from Ollama";

/// Error text returned by `GET /api/tags` when the upstream call fails
pub const TAGS_FAILED: &str = "Failed to fetch models";

/// Body of `POST /api/generate`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier as listed by `/api/tags`
    pub model: String,
    /// The user's prompt, sent as typed
    pub prompt: String,
    /// Whether the upstream should stream tokens
    #[serde(default)]
    pub stream: bool,
}

impl GenerateRequest {
    /// Create a non-streaming request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
        }
    }
}

/// The part of an upstream generate response that surfaces consume
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Generated text
    pub response: String,
}

/// A model entry from `/api/tags`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model identifier, e.g. `llama2:latest`
    pub name: String,
}

/// Body of a `/api/tags` response
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelList {
    /// Available models
    ///
    /// An absent or `null` field decodes as empty; entries without a
    /// string `name` are skipped.
    #[serde(default, deserialize_with = "named_models")]
    pub models: Vec<ModelDescriptor>,
}

/// Listing entry as sent upstream; only `name` matters
#[derive(Deserialize)]
struct ListingEntry {
    #[serde(default)]
    name: Option<String>,
}

fn named_models<'de, D>(deserializer: D) -> Result<Vec<ModelDescriptor>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<ListingEntry>>::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| entry.name)
        .map(|name| ModelDescriptor { name })
        .collect())
}

impl ModelList {
    /// Model names in listing order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.name.as_str())
    }
}

/// Failure payload returned with HTTP 500
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Fixed, route-specific error text
    pub error: String,
}

impl ErrorBody {
    /// Create an error body
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
