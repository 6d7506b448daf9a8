//! X (Twitter) API client.
//!
//! User lookup, user timelines and recent search use API v2 with an app
//! bearer token; trends are only available on v1.1 and need OAuth 1.0a
//! user credentials.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::ProviderError;
use super::http::{build_url, env_credential, send_json};
use super::oauth::{OAuthCredentials, authorization_header};

const PROVIDER: &str = "X";
pub const BEARER_TOKEN_ENV: &str = "X_BEARER_TOKEN";

const TIMELINE_MIN_RESULTS: u32 = 5;
const SEARCH_MIN_RESULTS: u32 = 10;
const MAX_RESULTS: u32 = 100;
const MAX_TRENDS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Recency,
    Relevancy,
}

impl SortOrder {
    /// Unknown values fall back to recency
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "relevancy" => SortOrder::Relevancy,
            _ => SortOrder::Recency,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Recency => "recency",
            SortOrder::Relevancy => "relevancy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub username: String,
    pub description: Option<String>,
    pub followers: u64,
    pub following: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostAuthor {
    pub username: String,
    pub name: String,
}

/// A post with its engagement counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub text: String,
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<PostAuthor>,
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTimeline {
    pub user: UserProfile,
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub name: String,
    pub url: String,
    pub tweet_volume: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendList {
    pub location: String,
    pub as_of: String,
    pub trends: Vec<Trend>,
}

#[async_trait]
pub trait SocialProvider: Send + Sync {
    async fn user_timeline(
        &self,
        username: &str,
        max_results: u32,
    ) -> Result<UserTimeline, ProviderError>;

    async fn search_recent(
        &self,
        query: &str,
        max_results: u32,
        sort_order: SortOrder,
    ) -> Result<Vec<Post>, ProviderError>;

    async fn trends(&self, woeid: i64) -> Result<TrendList, ProviderError>;
}

#[derive(Clone)]
pub struct HttpSocialProvider {
    endpoint: String,
    http: Client,
}

impl HttpSocialProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: Client::new(),
        }
    }

    async fn lookup_user(&self, token: &str, username: &str) -> Result<UserProfile, ProviderError> {
        let clean = username.trim().trim_start_matches('@');
        let url = build_url(
            &self.endpoint,
            &format!("2/users/by/username/{}", urlencoding::encode(clean)),
        );
        let request = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(&[("user.fields", "description,public_metrics")]);

        let envelope: ApiEnvelope<ApiUser> = send_json(PROVIDER, request).await?;
        match envelope.data {
            Some(user) => Ok(user.into_profile()),
            None => Err(ProviderError::NotFound(format!("User @{clean} not found"))),
        }
    }
}

#[async_trait]
impl SocialProvider for HttpSocialProvider {
    async fn user_timeline(
        &self,
        username: &str,
        max_results: u32,
    ) -> Result<UserTimeline, ProviderError> {
        let token = env_credential(BEARER_TOKEN_ENV)?;
        let user = self.lookup_user(&token, username).await?;
        debug!(username = %user.username, max_results, "Fetching user timeline");

        let wanted = max_results.clamp(1, MAX_RESULTS);
        let url = build_url(
            &self.endpoint,
            &format!("2/users/{}/tweets", urlencoding::encode(&user.id)),
        );
        let request = self.http.get(url).bearer_auth(&token).query(&[
            ("max_results", wanted.max(TIMELINE_MIN_RESULTS).to_string()),
            ("tweet.fields", "created_at,public_metrics".to_string()),
        ]);

        let envelope: ApiEnvelope<Vec<ApiTweet>> = send_json(PROVIDER, request).await?;
        let posts = envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .take(wanted as usize)
            .map(|tweet| tweet.into_post(None))
            .collect();

        Ok(UserTimeline { user, posts })
    }

    async fn search_recent(
        &self,
        query: &str,
        max_results: u32,
        sort_order: SortOrder,
    ) -> Result<Vec<Post>, ProviderError> {
        let token = env_credential(BEARER_TOKEN_ENV)?;
        debug!(query, max_results, sort = sort_order.as_str(), "Searching recent posts");

        let wanted = max_results.clamp(1, MAX_RESULTS);
        let url = build_url(&self.endpoint, "2/tweets/search/recent");
        let request = self.http.get(url).bearer_auth(&token).query(&[
            ("query", query.to_string()),
            ("max_results", wanted.max(SEARCH_MIN_RESULTS).to_string()),
            ("tweet.fields", "created_at,public_metrics,author_id".to_string()),
            ("expansions", "author_id".to_string()),
            ("user.fields", "username,name".to_string()),
            ("sort_order", sort_order.as_str().to_string()),
        ]);

        let envelope: ApiEnvelope<Vec<ApiTweet>> = send_json(PROVIDER, request).await?;
        let authors: HashMap<String, PostAuthor> = envelope
            .includes
            .map(|includes| includes.users)
            .unwrap_or_default()
            .into_iter()
            .map(|user| {
                (
                    user.id,
                    PostAuthor {
                        username: user.username,
                        name: user.name,
                    },
                )
            })
            .collect();

        Ok(envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .take(wanted as usize)
            .map(|tweet| {
                let author = tweet
                    .author_id
                    .as_ref()
                    .and_then(|id| authors.get(id))
                    .cloned();
                tweet.into_post(author)
            })
            .collect())
    }

    async fn trends(&self, woeid: i64) -> Result<TrendList, ProviderError> {
        let credentials = OAuthCredentials::from_env()?;
        debug!(woeid, "Fetching trending topics");

        let url = build_url(&self.endpoint, "1.1/trends/place.json");
        let id = woeid.to_string();
        let auth = authorization_header("GET", &url, &credentials, &[("id", id.as_str())])?;
        let request = self
            .http
            .get(&url)
            .header("Authorization", auth)
            .query(&[("id", id.as_str())]);

        let places: Vec<ApiTrendPlace> = send_json(PROVIDER, request).await?;
        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NotFound("No trends found".to_string()))?;

        Ok(TrendList {
            location: place
                .locations
                .into_iter()
                .next()
                .map(|location| location.name)
                .unwrap_or_default(),
            as_of: place.as_of,
            trends: place.trends.into_iter().take(MAX_TRENDS).collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    data: Option<T>,
    includes: Option<ApiIncludes>,
}

#[derive(Debug, Deserialize, Default)]
struct ApiIncludes {
    #[serde(default)]
    users: Vec<ApiUser>,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    id: String,
    name: String,
    username: String,
    description: Option<String>,
    public_metrics: Option<ApiUserMetrics>,
}

impl ApiUser {
    fn into_profile(self) -> UserProfile {
        let metrics = self.public_metrics.unwrap_or_default();
        UserProfile {
            id: self.id,
            name: self.name,
            username: self.username,
            description: self.description,
            followers: metrics.followers_count,
            following: metrics.following_count,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct ApiUserMetrics {
    #[serde(default)]
    followers_count: u64,
    #[serde(default)]
    following_count: u64,
}

#[derive(Debug, Deserialize)]
struct ApiTweet {
    id: String,
    text: String,
    created_at: Option<String>,
    author_id: Option<String>,
    public_metrics: Option<ApiTweetMetrics>,
}

impl ApiTweet {
    fn into_post(self, author: Option<PostAuthor>) -> Post {
        let metrics = self.public_metrics.unwrap_or_default();
        Post {
            id: self.id,
            text: self.text,
            created_at: self.created_at,
            author,
            likes: metrics.like_count,
            retweets: metrics.retweet_count,
            replies: metrics.reply_count,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct ApiTweetMetrics {
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    retweet_count: u64,
    #[serde(default)]
    reply_count: u64,
}

#[derive(Debug, Deserialize)]
struct ApiTrendPlace {
    #[serde(default)]
    trends: Vec<Trend>,
    #[serde(default)]
    as_of: String,
    #[serde(default)]
    locations: Vec<ApiLocation>,
}

#[derive(Debug, Deserialize)]
struct ApiLocation {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sort_order_falls_back_to_recency() {
        assert_eq!(SortOrder::parse_lenient(Some("Relevancy")), SortOrder::Relevancy);
        assert_eq!(SortOrder::parse_lenient(Some("popular")), SortOrder::Recency);
        assert_eq!(SortOrder::parse_lenient(None), SortOrder::Recency);
    }

    #[test]
    fn search_payload_maps_authors_and_metrics() {
        let envelope: ApiEnvelope<Vec<ApiTweet>> = serde_json::from_value(json!({
            "data": [{
                "id": "1", "text": "ground stop at EWR", "author_id": "42",
                "created_at": "2025-11-30T10:00:00Z",
                "public_metrics": {"like_count": 5, "retweet_count": 2, "reply_count": 1, "quote_count": 0}
            }],
            "includes": {"users": [{"id": "42", "name": "FAA", "username": "FAANews"}]}
        }))
        .expect("decode search payload");

        let users = envelope.includes.map(|i| i.users).unwrap_or_default();
        assert_eq!(users[0].username, "FAANews");
        let tweet = envelope.data.unwrap_or_default().remove(0);
        let post = tweet.into_post(None);
        assert_eq!((post.likes, post.retweets, post.replies), (5, 2, 1));
    }
}
