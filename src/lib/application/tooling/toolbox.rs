use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use super::command::{ToolCommand, ToolKind};
use super::error::ToolError;
use super::{flights, social, weather};
use crate::config::ToolsConfig;
use crate::infrastructure::providers::{
    FlightProvider, HttpFlightProvider, HttpSocialProvider, HttpWeatherProvider, SocialProvider,
    WeatherProvider,
};
use crate::types::ToolCall;

/// Executes tool commands against the configured data providers.
///
/// Shared by every worker; holds no per-conversation state.
#[derive(Clone)]
pub struct ToolBox {
    flights: Arc<dyn FlightProvider>,
    weather: Arc<dyn WeatherProvider>,
    social: Arc<dyn SocialProvider>,
}

impl ToolBox {
    pub fn new(
        flights: Arc<dyn FlightProvider>,
        weather: Arc<dyn WeatherProvider>,
        social: Arc<dyn SocialProvider>,
    ) -> Self {
        Self {
            flights,
            weather,
            social,
        }
    }

    pub fn from_config(config: &ToolsConfig) -> Self {
        Self::new(
            Arc::new(HttpFlightProvider::new(config.flights_endpoint.clone())),
            Arc::new(HttpWeatherProvider::new(
                config.weather_endpoint.clone(),
                config.weather_api_key_env.clone(),
            )),
            Arc::new(HttpSocialProvider::new(config.social_endpoint.clone())),
        )
    }

    /// Run a decoded command; the result is always an envelope value.
    pub async fn execute(&self, command: ToolCommand) -> Value {
        match command {
            ToolCommand::SearchFlights(args) => {
                flights::search_flights(self.flights.as_ref(), &args).await.into_value()
            }
            ToolCommand::FindBestPrice(args) => {
                flights::find_best_price(self.flights.as_ref(), &args).await.into_value()
            }
            ToolCommand::FindFastestFlight(args) => {
                flights::find_fastest_flight(self.flights.as_ref(), &args).await.into_value()
            }
            ToolCommand::CompareFlights(args) => {
                flights::compare_flights(self.flights.as_ref(), &args).await.into_value()
            }
            ToolCommand::FilterFlights(args) => {
                flights::filter_flights(self.flights.as_ref(), &args).await.into_value()
            }
            ToolCommand::CheckWeather(args) => {
                weather::check_weather(self.weather.as_ref(), &args).await.into_value()
            }
            ToolCommand::SearchUserPosts(args) => {
                social::search_user_posts(self.social.as_ref(), &args).await.into_value()
            }
            ToolCommand::SearchTopics(args) => {
                social::search_topics(self.social.as_ref(), &args).await.into_value()
            }
            ToolCommand::TrendingTopics(args) => {
                social::trending_topics(self.social.as_ref(), &args).await.into_value()
            }
            ToolCommand::AnalyzeEngagement(args) => {
                social::analyze_engagement(self.social.as_ref(), &args).await.into_value()
            }
        }
    }

    /// Resolve a model tool call against the caller's allowed tools and run it.
    ///
    /// Resolution failures are returned as error envelopes so the model can
    /// correct itself.
    pub async fn dispatch(&self, call: &ToolCall, allowed: &[ToolKind]) -> Value {
        match Self::resolve(call, allowed) {
            Ok(command) => {
                let kind = command.kind();
                info!(tool = %kind, call_id = %call.id, "Executing tool");
                let result = self.execute(command).await;
                if result.get("success").and_then(Value::as_bool) != Some(true) {
                    let error = result
                        .get("error")
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    warn!(tool = %kind, error, "Tool reported failure");
                }
                result
            }
            Err(err) => {
                warn!(tool = %call.name, error = %err, "Rejected tool call");
                err.to_envelope().into_value()
            }
        }
    }

    fn resolve(call: &ToolCall, allowed: &[ToolKind]) -> Result<ToolCommand, ToolError> {
        let kind =
            ToolKind::from_name(&call.name).ok_or_else(|| ToolError::UnknownTool(call.name.clone()))?;
        if !allowed.contains(&kind) {
            return Err(ToolError::NotAvailable(kind));
        }
        ToolCommand::parse(kind, call.arguments.clone())
    }
}
