use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::error::ProviderError;
use super::http::{build_url, env_credential, send_json};

const PROVIDER: &str = "weather";

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Raw current-conditions payload for a city
    async fn current(&self, city: &str) -> Result<Value, ProviderError>;
}

/// weatherapi.com client; the API key is read from the environment on each call
#[derive(Clone)]
pub struct HttpWeatherProvider {
    endpoint: String,
    api_key_env: String,
    http: Client,
}

impl HttpWeatherProvider {
    pub fn new(endpoint: impl Into<String>, api_key_env: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key_env: api_key_env.into(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl WeatherProvider for HttpWeatherProvider {
    async fn current(&self, city: &str) -> Result<Value, ProviderError> {
        let api_key = env_credential(&self.api_key_env)?;
        debug!(city, "Fetching current weather");

        let request = self
            .http
            .get(build_url(&self.endpoint, "current.json"))
            .query(&[("key", api_key.as_str()), ("q", city)]);
        send_json(PROVIDER, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn missing_key_fails_before_any_request() {
        unsafe { std::env::remove_var("FLUB_TEST_WEATHER_KEY") };
        let provider = HttpWeatherProvider::new("http://127.0.0.1:9", "FLUB_TEST_WEATHER_KEY");
        let err = provider.current("London").await.expect_err("missing key");
        assert_eq!(
            err.to_string(),
            "FLUB_TEST_WEATHER_KEY environment variable is not set"
        );
    }
}
