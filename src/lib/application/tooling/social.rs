//! Social media (X) tool adapters and engagement analysis.

use serde::Serialize;
use tracing::debug;

use super::command::{AnalyzeEngagementArgs, SearchTopicsArgs, SearchUserPostsArgs, TrendingTopicsArgs};
use super::envelope::Envelope;
use super::flights::round2;
use crate::infrastructure::providers::{
    Post, PostAuthor, SocialProvider, SortOrder, Trend, UserProfile,
};

const NO_MATCHES: &str = "No tweets found matching the query";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserPostsReport {
    pub user: UserProfile,
    pub tweets: Vec<Post>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicSearchReport {
    pub query: String,
    pub tweets: Vec<Post>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendsReport {
    pub location: String,
    pub as_of: String,
    pub trends: Vec<Trend>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementMetrics {
    pub total_likes: u64,
    pub total_retweets: u64,
    pub total_replies: u64,
    pub avg_likes_per_tweet: f64,
    pub avg_retweets_per_tweet: f64,
    pub avg_replies_per_tweet: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopEngagedPost {
    pub text: String,
    pub likes: u64,
    pub retweets: u64,
    pub author: Option<PostAuthor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementReport {
    pub query: Option<String>,
    pub total_tweets: usize,
    pub engagement_metrics: EngagementMetrics,
    pub top_engaged_tweet: TopEngagedPost,
}

pub async fn search_user_posts(
    provider: &dyn SocialProvider,
    args: &SearchUserPostsArgs,
) -> Envelope<UserPostsReport> {
    let username = args.username.trim().trim_start_matches('@');
    if username.is_empty() {
        return Envelope::failure("A username is required");
    }

    match provider.user_timeline(username, args.max_results).await {
        Ok(timeline) => Envelope::ok(UserPostsReport {
            count: timeline.posts.len(),
            user: timeline.user,
            tweets: timeline.posts,
        }),
        Err(err) => Envelope::failure(err.to_string()),
    }
}

pub async fn search_topics(
    provider: &dyn SocialProvider,
    args: &SearchTopicsArgs,
) -> Envelope<TopicSearchReport> {
    let sort_order = SortOrder::parse_lenient(args.sort_order.as_deref());
    match provider
        .search_recent(&args.query, args.max_results, sort_order)
        .await
    {
        Ok(posts) => Envelope::ok(TopicSearchReport {
            query: args.query.clone(),
            count: posts.len(),
            message: posts.is_empty().then(|| NO_MATCHES.to_string()),
            tweets: posts,
        }),
        Err(err) => Envelope::failure(err.to_string()),
    }
}

pub async fn trending_topics(
    provider: &dyn SocialProvider,
    args: &TrendingTopicsArgs,
) -> Envelope<TrendsReport> {
    match provider.trends(args.woeid).await {
        Ok(list) if list.trends.is_empty() => Envelope::failure("No trends found"),
        Ok(list) => Envelope::ok(TrendsReport {
            count: list.trends.len(),
            location: list.location,
            as_of: list.as_of,
            trends: list.trends,
        }),
        Err(err) => Envelope::failure(err.to_string()),
    }
}

/// Search by query (preferred) or username, then compute the engagement report.
pub async fn analyze_engagement(
    provider: &dyn SocialProvider,
    args: &AnalyzeEngagementArgs,
) -> Envelope<EngagementReport> {
    let query = args.query.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let username = args
        .username
        .as_deref()
        .map(|u| u.trim().trim_start_matches('@'))
        .filter(|u| !u.is_empty());

    let (label, posts) = match (query, username) {
        (Some(query), _) => {
            debug!(query, "Analyzing engagement for search query");
            let result = provider
                .search_recent(query, args.max_results, SortOrder::Recency)
                .await
                .map_err(|err| err.to_string());
            (Some(query.to_string()), result)
        }
        (None, Some(username)) => {
            debug!(username, "Analyzing engagement for user timeline");
            let result = provider
                .user_timeline(username, args.max_results)
                .await
                .map(|timeline| timeline.posts)
                .map_err(|err| err.to_string());
            (Some(format!("@{username}")), result)
        }
        (None, None) => {
            return Envelope::failure("Provide either 'query' or 'username' to analyze");
        }
    };

    match posts {
        Ok(posts) => engagement_report(label.as_deref(), &posts),
        Err(message) => Envelope::failure(message),
    }
}

/// Totals, 2-decimal averages and the most engaged post (first at max likes+retweets).
pub fn engagement_report(query: Option<&str>, posts: &[Post]) -> Envelope<EngagementReport> {
    let Some(first) = posts.first() else {
        return Envelope::failure("No valid tweets data provided");
    };

    let total_likes: u64 = posts.iter().map(|p| p.likes).sum();
    let total_retweets: u64 = posts.iter().map(|p| p.retweets).sum();
    let total_replies: u64 = posts.iter().map(|p| p.replies).sum();
    let count = posts.len() as f64;

    let top = posts.iter().skip(1).fold(first, |top, post| {
        if post.likes + post.retweets > top.likes + top.retweets {
            post
        } else {
            top
        }
    });

    Envelope::ok(EngagementReport {
        query: query.map(str::to_string),
        total_tweets: posts.len(),
        engagement_metrics: EngagementMetrics {
            total_likes,
            total_retweets,
            total_replies,
            avg_likes_per_tweet: round2(total_likes as f64 / count),
            avg_retweets_per_tweet: round2(total_retweets as f64 / count),
            avg_replies_per_tweet: round2(total_replies as f64 / count),
        },
        top_engaged_tweet: TopEngagedPost {
            text: top.text.clone(),
            likes: top.likes,
            retweets: top.retweets,
            author: top.author.clone(),
        },
    })
}
