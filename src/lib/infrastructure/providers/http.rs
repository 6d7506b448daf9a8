use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use super::error::ProviderError;

const MAX_ERROR_BODY: usize = 200;

/// Join a base endpoint and a path without doubling slashes
pub(super) fn build_url(endpoint: &str, path: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Send a request and decode a JSON body, mapping HTTP failures to [`ProviderError`].
pub(super) async fn send_json<T: DeserializeOwned>(
    provider: &'static str,
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|source| ProviderError::network(provider, source))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| ProviderError::network(provider, source))?;

    if status.as_u16() == 429 {
        return Err(ProviderError::RateLimited { provider });
    }
    if !status.is_success() {
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
            body: truncate(&body).to_string(),
        });
    }

    serde_json::from_str(&body).map_err(|err| ProviderError::invalid(provider, err.to_string()))
}

/// Read a non-empty environment variable
pub(super) fn env_credential(variable: &str) -> Result<String, ProviderError> {
    std::env::var(variable)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ProviderError::missing_env(variable))
}

fn truncate(body: &str) -> &str {
    if body.len() <= MAX_ERROR_BODY {
        return body;
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
