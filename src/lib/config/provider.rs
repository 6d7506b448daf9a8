//! # Provider Configuration
//!
//! Configuration types for LLM completion providers.
//!
//! | Type | Description |
//! |------|-------------|
//! | `openai` | OpenAI-compatible chat/completions (default) |
//! | `anthropic` | Anthropic Messages API |

use serde::{Deserialize, Serialize};

/// Configuration for an LLM completion provider.
///
/// # Example
///
/// ```toml
/// [[providers]]
/// id = "dedalus"
/// type = "openai"
/// endpoint = "https://api.dedaluslabs.ai"
/// api_key = "DEDALUS_API_KEY"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelProviderConfig {
    /// Unique identifier referenced by the router and workers
    pub id: String,
    /// The provider type determines API format: "openai" or "anthropic"
    #[serde(rename = "type")]
    pub provider_type: String,
    /// API endpoint URL
    pub endpoint: String,
    /// Name of the environment variable holding the API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Custom API path override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_path: Option<String>,
    /// Allowed models; empty means any model is accepted
    pub models: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct RawProviderConfig {
    pub(super) id: String,
    #[serde(rename = "type", default)]
    pub(super) provider_type: String,
    pub(super) endpoint: Option<String>,
    pub(super) api_key: Option<String>,
    #[serde(default)]
    pub(super) api_path: Option<String>,
    #[serde(default)]
    pub(super) models: Vec<String>,
}

impl From<RawProviderConfig> for ModelProviderConfig {
    fn from(raw: RawProviderConfig) -> Self {
        Self {
            id: raw.id,
            provider_type: raw.provider_type,
            endpoint: raw.endpoint.unwrap_or_default(),
            api_key: raw.api_key,
            api_path: raw.api_path,
            models: raw.models,
        }
    }
}

impl ModelProviderConfig {
    /// Ensure a model exists in this provider's allow-list (no-op when the list is open)
    pub fn ensure_model(&mut self, model: &str) {
        if !self.models.is_empty() && self.models.iter().all(|name| name != model) {
            self.models.push(model.to_string());
        }
    }

    /// Check if this provider speaks the Anthropic Messages API (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use flub_agent::config::ModelProviderConfig;
    ///
    /// let provider = ModelProviderConfig {
    ///     id: "claude".to_string(),
    ///     provider_type: "Anthropic".to_string(),
    ///     endpoint: "https://api.anthropic.com".to_string(),
    ///     api_key: Some("ANTHROPIC_API_KEY".to_string()),
    ///     api_path: None,
    ///     models: vec![],
    /// };
    /// assert!(provider.is_anthropic());
    /// ```
    pub fn is_anthropic(&self) -> bool {
        self.provider_type.eq_ignore_ascii_case("anthropic")
            || self.provider_type.eq_ignore_ascii_case("claude")
    }
}

impl ModelProviderConfig {
    /// The hosted OpenAI-compatible router used when no providers are configured
    pub fn builtin() -> Self {
        use super::defaults::{
            DEFAULT_PROVIDER_ENDPOINT, DEFAULT_PROVIDER_ID, DEFAULT_PROVIDER_KEY_ENV,
            DEFAULT_PROVIDER_TYPE,
        };
        Self {
            id: DEFAULT_PROVIDER_ID.to_string(),
            provider_type: DEFAULT_PROVIDER_TYPE.to_string(),
            endpoint: DEFAULT_PROVIDER_ENDPOINT.to_string(),
            api_key: Some(DEFAULT_PROVIDER_KEY_ENV.to_string()),
            api_path: None,
            models: Vec::new(),
        }
    }
}
