use serde_json::{Map, Value};
use tracing::debug;

use super::command::CheckWeatherArgs;
use super::envelope::Envelope;
use crate::infrastructure::providers::WeatherProvider;

/// Current conditions for a city, passing the provider payload through unchanged.
pub async fn check_weather(
    provider: &dyn WeatherProvider,
    args: &CheckWeatherArgs,
) -> Envelope<Map<String, Value>> {
    let city = args.city.trim();
    if city.is_empty() {
        return Envelope::failure("A city name is required");
    }
    debug!(city, "Checking weather");

    match provider.current(city).await {
        Ok(Value::Object(payload)) => Envelope::ok(payload),
        Ok(other) => {
            let mut payload = Map::new();
            payload.insert("data".to_string(), other);
            Envelope::ok(payload)
        }
        Err(err) => Envelope::failure(format!("Weather lookup failed: {err}")),
    }
}
