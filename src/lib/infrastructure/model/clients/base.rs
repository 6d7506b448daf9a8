//! Shared HTTP plumbing for completion clients

use crate::infrastructure::model::types::ModelError;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

const MAX_ERROR_BODY: usize = 300;

/// How a client presents its API key
pub enum Auth<'a> {
    Bearer,
    /// Key in a named header, plus fixed extra headers (Anthropic style)
    Header {
        name: &'a str,
        extra: &'a [(&'a str, &'a str)],
    },
}

#[derive(Clone)]
pub struct HttpClientBase {
    pub id: String,
    pub endpoint: String,
    api_key: Option<String>,
    http: Client,
}

impl HttpClientBase {
    pub fn new(id: String, endpoint: String, api_key: Option<String>) -> Self {
        Self {
            id,
            endpoint,
            api_key,
            http: Client::new(),
        }
    }

    pub fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// POST a JSON body and decode the JSON reply. Non-success statuses keep
    /// a snippet of the body for diagnostics.
    pub async fn post_json<Req, Res>(
        &self,
        url: &str,
        auth: Auth<'_>,
        body: &Req,
    ) -> Result<Res, ModelError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ModelError::missing_api_key(&self.id))?;

        let request = match auth {
            Auth::Bearer => self.http.post(url).bearer_auth(api_key),
            Auth::Header { name, extra } => extra
                .iter()
                .fold(self.http.post(url).header(name, api_key), |request, (key, value)| {
                    request.header(*key, *value)
                }),
        };

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|err| ModelError::network(&self.id, err))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(
                provider = self.id.as_str(),
                status = status.as_u16(),
                "Completion request rejected"
            );
            return Err(ModelError::Status {
                provider: self.id.clone(),
                status: status.as_u16(),
                body: snippet(&text),
            });
        }

        response
            .json()
            .await
            .map_err(|err| ModelError::invalid_response(&self.id, err.to_string()))
    }
}

fn snippet(text: &str) -> String {
    let text = text.trim();
    if text.len() <= MAX_ERROR_BODY {
        return text.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_with_a_single_slash() {
        let base = HttpClientBase::new("p".into(), "https://api.example.com/".into(), None);
        assert_eq!(
            base.build_url("/v1/messages"),
            "https://api.example.com/v1/messages"
        );
    }

    #[test]
    fn long_error_bodies_are_cut_on_char_boundaries() {
        let body = "ü".repeat(400);
        let cut = snippet(&body);
        assert!(cut.ends_with("..."));
        assert!(cut.len() <= MAX_ERROR_BODY + 3);
        assert_eq!(snippet("  short  "), "short");
    }

    #[tokio::test]
    async fn missing_key_fails_before_sending() {
        let base = HttpClientBase::new("dedalus".into(), "http://127.0.0.1:9".into(), None);
        let err = base
            .post_json::<_, serde_json::Value>("http://127.0.0.1:9/x", Auth::Bearer, &())
            .await
            .expect_err("no key");
        assert!(matches!(err, ModelError::MissingApiKey { .. }));
    }
}
