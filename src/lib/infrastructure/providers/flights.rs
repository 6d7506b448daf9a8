//! Flight search gateway client.
//!
//! The gateway fronts a Google Flights scraper and answers
//! `GET /flights?date=..&from=..&to=..` with the scraper's result shape.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use super::error::ProviderError;
use super::http::{build_url, send_json};

const PROVIDER: &str = "flight search";

/// Passenger counts for a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passengers {
    pub adults: u32,
    pub children: u32,
    pub infants_in_seat: u32,
    pub infants_on_lap: u32,
}

impl Default for Passengers {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
            infants_in_seat: 0,
            infants_on_lap: 0,
        }
    }
}

/// One-way economy search between two airports on a date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightQuery {
    pub date: String,
    pub from_airport: String,
    pub to_airport: String,
    pub passengers: Passengers,
}

/// A single offer as reported by the scraper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOffer {
    pub name: String,
    pub departure: String,
    pub arrival: String,
    #[serde(default)]
    pub departure_time_ahead: Option<String>,
    #[serde(default)]
    pub arrival_time_ahead: Option<String>,
    pub duration: String,
    /// Number of stops; `None` when the scraper could not tell
    #[serde(default, deserialize_with = "lenient_stops")]
    pub stops: Option<u32>,
    pub price: String,
    #[serde(default)]
    pub is_best: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightResults {
    /// Google's "low / typical / high" price indicator
    #[serde(default)]
    pub current_price: Option<String>,
    #[serde(default)]
    pub flights: Vec<FlightOffer>,
}

fn lenient_stops<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[async_trait]
pub trait FlightProvider: Send + Sync {
    async fn search(&self, query: &FlightQuery) -> Result<FlightResults, ProviderError>;
}

/// Flight provider backed by the HTTP gateway
#[derive(Clone)]
pub struct HttpFlightProvider {
    endpoint: String,
    http: Client,
}

impl HttpFlightProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl FlightProvider for HttpFlightProvider {
    async fn search(&self, query: &FlightQuery) -> Result<FlightResults, ProviderError> {
        let url = build_url(&self.endpoint, "flights");
        debug!(
            from = %query.from_airport,
            to = %query.to_airport,
            date = %query.date,
            "Querying flight search gateway"
        );

        let passengers = query.passengers;
        let request = self.http.get(&url).query(&[
            ("date", query.date.clone()),
            ("from", query.from_airport.clone()),
            ("to", query.to_airport.clone()),
            ("adults", passengers.adults.to_string()),
            ("children", passengers.children.to_string()),
            ("infants_in_seat", passengers.infants_in_seat.to_string()),
            ("infants_on_lap", passengers.infants_on_lap.to_string()),
            ("trip", "one-way".to_string()),
            ("seat", "economy".to_string()),
        ]);

        send_json(PROVIDER, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn offer_accepts_numeric_and_textual_stops() {
        let numeric: FlightOffer = serde_json::from_value(json!({
            "name": "United", "departure": "8:00 AM", "arrival": "11:05 AM",
            "duration": "6 hr 5 min", "stops": 0, "price": "$200"
        }))
        .expect("numeric stops");
        assert_eq!(numeric.stops, Some(0));
        assert!(!numeric.is_best);

        let unknown: FlightOffer = serde_json::from_value(json!({
            "name": "Delta", "departure": "9:00 AM", "arrival": "1:00 PM",
            "duration": "7 hr", "stops": "Unknown", "price": "$350", "is_best": true
        }))
        .expect("textual stops");
        assert_eq!(unknown.stops, None);
        assert!(unknown.is_best);
    }
}
