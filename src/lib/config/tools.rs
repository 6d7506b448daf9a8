use serde::Deserialize;

use super::defaults::{
    DEFAULT_FLIGHTS_ENDPOINT, DEFAULT_SOCIAL_ENDPOINT, DEFAULT_WEATHER_API_KEY_ENV,
    DEFAULT_WEATHER_ENDPOINT,
};

/// Endpoints of the external data providers behind the tool adapters.
///
/// Credentials are not part of this struct: they are read from the
/// environment when a tool first needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolsConfig {
    pub flights_endpoint: String,
    pub weather_endpoint: String,
    pub weather_api_key_env: String,
    pub social_endpoint: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            flights_endpoint: DEFAULT_FLIGHTS_ENDPOINT.to_string(),
            weather_endpoint: DEFAULT_WEATHER_ENDPOINT.to_string(),
            weather_api_key_env: DEFAULT_WEATHER_API_KEY_ENV.to_string(),
            social_endpoint: DEFAULT_SOCIAL_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub(super) struct RawToolsConfig {
    flights_endpoint: Option<String>,
    weather_endpoint: Option<String>,
    weather_api_key_env: Option<String>,
    social_endpoint: Option<String>,
}

fn expand(value: String) -> String {
    shellexpand::full(&value)
        .map(|cow| cow.into_owned())
        .unwrap_or(value)
}

impl From<RawToolsConfig> for ToolsConfig {
    fn from(raw: RawToolsConfig) -> Self {
        let defaults = ToolsConfig::default();
        Self {
            flights_endpoint: raw
                .flights_endpoint
                .map(expand)
                .unwrap_or(defaults.flights_endpoint),
            weather_endpoint: raw
                .weather_endpoint
                .map(expand)
                .unwrap_or(defaults.weather_endpoint),
            weather_api_key_env: raw
                .weather_api_key_env
                .unwrap_or(defaults.weather_api_key_env),
            social_endpoint: raw
                .social_endpoint
                .map(expand)
                .unwrap_or(defaults.social_endpoint),
        }
    }
}
