//! Provider factory - creates clients from config

use super::clients::{AnthropicClient, OpenAIClient};
use super::traits::ModelClient;
use crate::config::ModelProviderConfig;
use std::env;
use tracing::warn;

/// Resolve API key from the environment variable named in the config.
///
/// A missing variable is only logged here; the client reports
/// `MissingApiKey` on its first request.
pub fn resolve_api_key(provider: &str, spec: Option<&str>) -> Option<String> {
    let raw = spec.map(str::trim)?;
    if raw.is_empty() {
        return None;
    }
    let name = raw.trim_start_matches("${").trim_end_matches('}');
    match env::var(name) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                provider,
                env_var = name,
                %err,
                "API key environment variable is not set"
            );
            None
        }
    }
}

/// Factory for creating model clients from provider config.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Creates a model client based on provider type.
    ///
    /// Supported types:
    /// - `anthropic`, `claude` → Anthropic Messages API
    /// - Others → OpenAI-compatible format (default)
    pub fn create(config: &ModelProviderConfig) -> Box<dyn ModelClient> {
        if config.is_anthropic() {
            Box::new(AnthropicClient::from_config(config))
        } else {
            Box::new(OpenAIClient::from_config(config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn resolves_plain_and_braced_variable_names() {
        unsafe { env::set_var("FLUB_TEST_MODEL_KEY", "secret") };
        assert_eq!(
            resolve_api_key("p", Some("FLUB_TEST_MODEL_KEY")).as_deref(),
            Some("secret")
        );
        assert_eq!(
            resolve_api_key("p", Some("${FLUB_TEST_MODEL_KEY}")).as_deref(),
            Some("secret")
        );
        unsafe { env::remove_var("FLUB_TEST_MODEL_KEY") };
        assert_eq!(resolve_api_key("p", Some("FLUB_TEST_MODEL_KEY")), None);
        assert_eq!(resolve_api_key("p", Some("  ")), None);
        assert_eq!(resolve_api_key("p", None), None);
    }
}
