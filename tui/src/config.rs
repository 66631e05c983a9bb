//! Client configuration

use crate::session::DEFAULT_MODEL;

/// Forwarder address used when nothing else is configured
pub const DEFAULT_FORWARDER_URL: &str = "http://localhost:3001";

/// Where the client sends requests and which model it starts with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the forwarder, without a trailing slash
    pub forwarder_url: String,
    /// Model selected at startup
    pub default_model: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            forwarder_url: DEFAULT_FORWARDER_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Build a config, normalizing the forwarder URL
    pub fn new(forwarder_url: impl Into<String>, default_model: impl Into<String>) -> Self {
        let forwarder_url: String = forwarder_url.into();
        Self {
            forwarder_url: forwarder_url.trim_end_matches('/').to_string(),
            default_model: default_model.into(),
        }
    }

    /// URL of the generate route
    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.forwarder_url)
    }

    /// URL of the model listing route
    pub fn tags_url(&self) -> String {
        format!("{}/api/tags", self.forwarder_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.generate_url(), "http://localhost:3001/api/generate");
        assert_eq!(config.tags_url(), "http://localhost:3001/api/tags");
        assert_eq!(config.default_model, "llama2");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig::new("http://gpu-box:4001//", "mistral");
        assert_eq!(config.forwarder_url, "http://gpu-box:4001");
        assert_eq!(config.tags_url(), "http://gpu-box:4001/api/tags");
    }
}
