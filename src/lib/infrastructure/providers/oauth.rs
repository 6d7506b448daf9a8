//! OAuth 1.0a request signing (HMAC-SHA1) for the X API v1.1 endpoints.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use urlencoding::encode;

use super::error::ProviderError;
use super::http::env_credential;

type HmacSha1 = Hmac<Sha1>;

pub const API_KEY_ENV: &str = "X_API_KEY";
pub const API_SECRET_ENV: &str = "X_API_SECRET";
pub const ACCESS_TOKEN_ENV: &str = "X_ACCESS_TOKEN";
pub const ACCESS_TOKEN_SECRET_ENV: &str = "X_ACCESS_TOKEN_SECRET";

/// User-context credentials for OAuth 1.0a
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl OAuthCredentials {
    /// Read all four credentials; any missing one fails with a combined message.
    pub fn from_env() -> Result<Self, ProviderError> {
        let read = |name: &str| env_credential(name).ok();
        match (
            read(API_KEY_ENV),
            read(API_SECRET_ENV),
            read(ACCESS_TOKEN_ENV),
            read(ACCESS_TOKEN_SECRET_ENV),
        ) {
            (Some(consumer_key), Some(consumer_secret), Some(access_token), Some(access_token_secret)) => {
                Ok(Self {
                    consumer_key,
                    consumer_secret,
                    access_token,
                    access_token_secret,
                })
            }
            _ => Err(ProviderError::MissingCredential(format!(
                "Trending topics require full API credentials. Please set {API_KEY_ENV}, \
                 {API_SECRET_ENV}, {ACCESS_TOKEN_ENV}, and {ACCESS_TOKEN_SECRET_ENV} environment variables."
            ))),
        }
    }
}

/// Build the `Authorization` header for a request with a fresh nonce and timestamp.
pub fn authorization_header(
    method: &str,
    url: &str,
    credentials: &OAuthCredentials,
    query: &[(&str, &str)],
) -> Result<String, ProviderError> {
    let nonce: String = (0..16)
        .map(|_| format!("{:02x}", rand::random::<u8>()))
        .collect();
    let timestamp = chrono::Utc::now().timestamp().to_string();
    signed_header(method, url, credentials, query, &nonce, &timestamp)
}

pub(crate) fn signed_header(
    method: &str,
    url: &str,
    credentials: &OAuthCredentials,
    query: &[(&str, &str)],
    nonce: &str,
    timestamp: &str,
) -> Result<String, ProviderError> {
    let oauth_params = [
        ("oauth_consumer_key", credentials.consumer_key.as_str()),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", timestamp),
        ("oauth_token", credentials.access_token.as_str()),
        ("oauth_version", "1.0"),
    ];

    let mut params: Vec<(String, String)> = oauth_params
        .iter()
        .chain(query.iter())
        .map(|(k, v)| (encode(k).into_owned(), encode(v).into_owned()))
        .collect();
    params.sort();

    let param_string = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let base_string = format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(url),
        encode(&param_string)
    );
    let signing_key = format!(
        "{}&{}",
        encode(&credentials.consumer_secret),
        encode(&credentials.access_token_secret)
    );

    let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
        .map_err(|err| ProviderError::MissingCredential(format!("invalid signing key: {err}")))?;
    mac.update(base_string.as_bytes());
    let signature = BASE64.encode(mac.finalize().into_bytes());

    let header = oauth_params
        .iter()
        .copied()
        .chain(std::iter::once(("oauth_signature", signature.as_str())))
        .map(|(k, v)| format!("{k}=\"{}\"", encode(v)))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!("OAuth {header}"))
}
