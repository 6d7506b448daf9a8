//! Closed set of tool kinds and their typed arguments.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::error::ToolError;
use crate::infrastructure::model::ToolDefinition;
use crate::infrastructure::providers::Passengers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    SearchFlights,
    FindBestPrice,
    FindFastestFlight,
    CompareFlights,
    FilterFlights,
    CheckWeather,
    SearchUserPosts,
    SearchTopics,
    TrendingTopics,
    AnalyzeEngagement,
}

const FLIGHT_TOOLS: [ToolKind; 5] = [
    ToolKind::SearchFlights,
    ToolKind::FindBestPrice,
    ToolKind::FindFastestFlight,
    ToolKind::CompareFlights,
    ToolKind::FilterFlights,
];

const SOCIAL_TOOLS: [ToolKind; 4] = [
    ToolKind::SearchUserPosts,
    ToolKind::SearchTopics,
    ToolKind::TrendingTopics,
    ToolKind::AnalyzeEngagement,
];

impl ToolKind {
    pub const ALL: [ToolKind; 10] = [
        ToolKind::SearchFlights,
        ToolKind::FindBestPrice,
        ToolKind::FindFastestFlight,
        ToolKind::CompareFlights,
        ToolKind::FilterFlights,
        ToolKind::CheckWeather,
        ToolKind::SearchUserPosts,
        ToolKind::SearchTopics,
        ToolKind::TrendingTopics,
        ToolKind::AnalyzeEngagement,
    ];

    pub fn flights() -> &'static [ToolKind] {
        &FLIGHT_TOOLS
    }

    pub fn social() -> &'static [ToolKind] {
        &SOCIAL_TOOLS
    }

    /// Wire name used in model tool calls
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::SearchFlights => "search_flights",
            ToolKind::FindBestPrice => "find_best_price",
            ToolKind::FindFastestFlight => "find_fastest_flight",
            ToolKind::CompareFlights => "compare_flights",
            ToolKind::FilterFlights => "filter_flights",
            ToolKind::CheckWeather => "check_weather",
            ToolKind::SearchUserPosts => "search_user_posts",
            ToolKind::SearchTopics => "search_topics",
            ToolKind::TrendingTopics => "trending_topics",
            ToolKind::AnalyzeEngagement => "analyze_engagement",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolKind::SearchFlights => {
                "Search one-way economy flights between two airports on a date. Returns ranked offers, \
                 the price range and the current price indicator."
            }
            ToolKind::FindBestPrice => {
                "Find the cheapest flight for a route and date, with a price comparison across all offers."
            }
            ToolKind::FindFastestFlight => {
                "Find the flight with the shortest total duration for a route and date."
            }
            ToolKind::CompareFlights => {
                "Compare offers for a route and date: cheapest, fastest and best-rated flights plus statistics."
            }
            ToolKind::FilterFlights => {
                "Search flights and keep only offers matching every given filter: maximum price, \
                 maximum duration in minutes, maximum stops, direct only."
            }
            ToolKind::CheckWeather => "Get current weather conditions for a city.",
            ToolKind::SearchUserPosts => {
                "Fetch an X (Twitter) user's profile and most recent posts with engagement counts."
            }
            ToolKind::SearchTopics => {
                "Search recent X (Twitter) posts matching a query, sorted by recency or relevancy."
            }
            ToolKind::TrendingTopics => {
                "List current trending topics on X (Twitter) for a location (WOEID, 1 = worldwide)."
            }
            ToolKind::AnalyzeEngagement => {
                "Analyze engagement (likes, retweets, replies) of recent posts for a search query or a username."
            }
        }
    }

    /// JSON schema of the tool arguments
    pub fn parameters(&self) -> Value {
        match self {
            ToolKind::SearchFlights => {
                let mut schema = route_schema();
                schema["properties"]["max_results"] = json!({
                    "type": "integer",
                    "description": "Maximum number of flights to return (default 10)",
                    "minimum": 1
                });
                schema
            }
            ToolKind::FindBestPrice | ToolKind::FindFastestFlight | ToolKind::CompareFlights => {
                route_schema()
            }
            ToolKind::FilterFlights => {
                let mut schema = route_schema();
                let properties = &mut schema["properties"];
                properties["max_price"] = json!({
                    "type": "integer",
                    "description": "Maximum price in whole currency units"
                });
                properties["max_duration_minutes"] = json!({
                    "type": "integer",
                    "description": "Maximum total duration in minutes"
                });
                properties["max_stops"] = json!({
                    "type": "integer",
                    "description": "Maximum number of stops"
                });
                properties["direct_only"] = json!({
                    "type": "boolean",
                    "description": "Only keep non-stop flights"
                });
                schema
            }
            ToolKind::CheckWeather => json!({
                "type": "object",
                "properties": {
                    "city": {"type": "string", "description": "Name of the city"}
                },
                "required": ["city"]
            }),
            ToolKind::SearchUserPosts => json!({
                "type": "object",
                "properties": {
                    "username": {"type": "string", "description": "X username without @"},
                    "max_results": {"type": "integer", "description": "Posts to return (default 10, max 100)"}
                },
                "required": ["username"]
            }),
            ToolKind::SearchTopics => json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Search query or topic"},
                    "max_results": {"type": "integer", "description": "Posts to return (default 10, max 100)"},
                    "sort_order": {"type": "string", "enum": ["recency", "relevancy"]}
                },
                "required": ["query"]
            }),
            ToolKind::TrendingTopics => json!({
                "type": "object",
                "properties": {
                    "woeid": {
                        "type": "integer",
                        "description": "Where On Earth ID: 1 = worldwide, 23424977 = USA, 2459115 = New York"
                    }
                }
            }),
            ToolKind::AnalyzeEngagement => json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Search query to analyze"},
                    "username": {"type": "string", "description": "Username whose posts to analyze"},
                    "max_results": {"type": "integer", "description": "Posts to analyze (default 10, max 100)"}
                }
            }),
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn route_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "date": {"type": "string", "description": "Flight date in YYYY-MM-DD format"},
            "from_airport": {"type": "string", "description": "Departure airport IATA code, e.g. EWR"},
            "to_airport": {"type": "string", "description": "Arrival airport IATA code, e.g. LAX"},
            "adults": {"type": "integer", "description": "Adult passengers (default 1)"},
            "children": {"type": "integer", "description": "Child passengers (default 0)"},
            "infants_in_seat": {"type": "integer", "description": "Infants in seat (default 0)"},
            "infants_on_lap": {"type": "integer", "description": "Infants on lap (default 0)"}
        },
        "required": ["date", "from_airport", "to_airport"]
    })
}

fn default_adults() -> u32 {
    1
}

fn default_max_results() -> u32 {
    10
}

fn default_woeid() -> i64 {
    1
}

/// Route, date and passengers shared by every flight tool
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FlightRouteArgs {
    pub date: String,
    pub from_airport: String,
    pub to_airport: String,
    #[serde(default = "default_adults")]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub infants_in_seat: u32,
    #[serde(default)]
    pub infants_on_lap: u32,
}

impl FlightRouteArgs {
    pub fn passengers(&self) -> Passengers {
        Passengers {
            adults: self.adults,
            children: self.children,
            infants_in_seat: self.infants_in_seat,
            infants_on_lap: self.infants_on_lap,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchFlightsArgs {
    #[serde(flatten)]
    pub route: FlightRouteArgs,
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// Optional predicates, all of which must hold
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_stops: Option<u32>,
    #[serde(default)]
    pub direct_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FilterFlightsArgs {
    #[serde(flatten)]
    pub route: FlightRouteArgs,
    #[serde(flatten)]
    pub filters: FlightFilters,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckWeatherArgs {
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchUserPostsArgs {
    pub username: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchTopicsArgs {
    pub query: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default)]
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrendingTopicsArgs {
    #[serde(default = "default_woeid")]
    pub woeid: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalyzeEngagementArgs {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

/// A tool request with decoded arguments, one variant per [`ToolKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCommand {
    SearchFlights(SearchFlightsArgs),
    FindBestPrice(FlightRouteArgs),
    FindFastestFlight(FlightRouteArgs),
    CompareFlights(FlightRouteArgs),
    FilterFlights(FilterFlightsArgs),
    CheckWeather(CheckWeatherArgs),
    SearchUserPosts(SearchUserPostsArgs),
    SearchTopics(SearchTopicsArgs),
    TrendingTopics(TrendingTopicsArgs),
    AnalyzeEngagement(AnalyzeEngagementArgs),
}

impl ToolCommand {
    /// Decode model-supplied arguments for a tool kind. `null` counts as `{}`.
    pub fn parse(kind: ToolKind, arguments: Value) -> Result<Self, ToolError> {
        let arguments = match arguments {
            Value::Null => json!({}),
            Value::Object(_) => arguments,
            other => {
                return Err(ToolError::InvalidArguments {
                    tool: kind,
                    reason: format!("expected a JSON object, got {other}"),
                });
            }
        };

        Ok(match kind {
            ToolKind::SearchFlights => ToolCommand::SearchFlights(decode(kind, arguments)?),
            ToolKind::FindBestPrice => ToolCommand::FindBestPrice(decode(kind, arguments)?),
            ToolKind::FindFastestFlight => ToolCommand::FindFastestFlight(decode(kind, arguments)?),
            ToolKind::CompareFlights => ToolCommand::CompareFlights(decode(kind, arguments)?),
            ToolKind::FilterFlights => ToolCommand::FilterFlights(decode(kind, arguments)?),
            ToolKind::CheckWeather => ToolCommand::CheckWeather(decode(kind, arguments)?),
            ToolKind::SearchUserPosts => ToolCommand::SearchUserPosts(decode(kind, arguments)?),
            ToolKind::SearchTopics => ToolCommand::SearchTopics(decode(kind, arguments)?),
            ToolKind::TrendingTopics => ToolCommand::TrendingTopics(decode(kind, arguments)?),
            ToolKind::AnalyzeEngagement => ToolCommand::AnalyzeEngagement(decode(kind, arguments)?),
        })
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            ToolCommand::SearchFlights(_) => ToolKind::SearchFlights,
            ToolCommand::FindBestPrice(_) => ToolKind::FindBestPrice,
            ToolCommand::FindFastestFlight(_) => ToolKind::FindFastestFlight,
            ToolCommand::CompareFlights(_) => ToolKind::CompareFlights,
            ToolCommand::FilterFlights(_) => ToolKind::FilterFlights,
            ToolCommand::CheckWeather(_) => ToolKind::CheckWeather,
            ToolCommand::SearchUserPosts(_) => ToolKind::SearchUserPosts,
            ToolCommand::SearchTopics(_) => ToolKind::SearchTopics,
            ToolCommand::TrendingTopics(_) => ToolKind::TrendingTopics,
            ToolCommand::AnalyzeEngagement(_) => ToolKind::AnalyzeEngagement,
        }
    }
}

fn decode<T: DeserializeOwned>(kind: ToolKind, arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|err| ToolError::InvalidArguments {
        tool: kind,
        reason: err.to_string(),
    })
}
