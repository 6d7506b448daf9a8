use thiserror::Error;

/// Failures talking to an external data provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0}")]
    MissingCredential(String),

    #[error("request to {provider} failed: {source}")]
    Network {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} API error ({status}): {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{provider} returned an invalid response: {reason}")]
    InvalidResponse {
        provider: &'static str,
        reason: String,
    },

    #[error("{provider} rate limit reached, try again later")]
    RateLimited { provider: &'static str },
}

impl ProviderError {
    pub fn missing_env(variable: &str) -> Self {
        Self::MissingCredential(format!("{variable} environment variable is not set"))
    }

    pub fn network(provider: &'static str, source: reqwest::Error) -> Self {
        Self::Network { provider, source }
    }

    pub fn invalid(provider: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider,
            reason: reason.into(),
        }
    }
}
