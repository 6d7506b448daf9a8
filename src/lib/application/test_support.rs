//! Stub model and data providers shared by unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::application::tooling::ToolBox;
use crate::infrastructure::model::{ModelError, ModelProvider, ModelRequest, ModelResponse};
use crate::infrastructure::providers::{
    FlightOffer, FlightProvider, FlightQuery, FlightResults, Post, ProviderError, SocialProvider,
    SortOrder, TrendList, UserTimeline, WeatherProvider,
};
use crate::types::{ChatMessage, ToolCall};

type Responder = dyn Fn(&ModelRequest) -> Result<ModelResponse, ModelError> + Send + Sync;

/// Model provider answering through a closure and recording every request.
pub(crate) struct StubModel {
    responder: Box<Responder>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl StubModel {
    pub(crate) fn new(
        responder: impl Fn(&ModelRequest) -> Result<ModelResponse, ModelError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl ModelProvider for StubModel {
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let response = (self.responder)(&request);
        self.requests.lock().expect("requests lock").push(request);
        response
    }
}

/// Text of the last message in a request
pub(crate) fn last_content(request: &ModelRequest) -> &str {
    request
        .messages
        .last()
        .map(|message| message.content.as_str())
        .unwrap_or_default()
}

pub(crate) fn tool_request(id: &str, name: &str, arguments: Value) -> ModelResponse {
    ModelResponse {
        message: ChatMessage::assistant_with_tools(
            "",
            vec![ToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments,
            }],
        ),
    }
}

pub(crate) fn offer(name: &str, price: &str, duration: &str) -> FlightOffer {
    FlightOffer {
        name: name.to_string(),
        departure: "8:00 AM on Mon, Dec 1".to_string(),
        arrival: "11:05 AM on Mon, Dec 1".to_string(),
        departure_time_ahead: None,
        arrival_time_ahead: None,
        duration: duration.to_string(),
        stops: Some(0),
        price: price.to_string(),
        is_best: false,
        delay: None,
    }
}

pub(crate) struct FixedFlights(pub Vec<FlightOffer>);

#[async_trait]
impl FlightProvider for FixedFlights {
    async fn search(&self, _query: &FlightQuery) -> Result<FlightResults, ProviderError> {
        Ok(FlightResults {
            current_price: Some("low".to_string()),
            flights: self.0.clone(),
        })
    }
}

pub(crate) struct FixedWeather;

#[async_trait]
impl WeatherProvider for FixedWeather {
    async fn current(&self, city: &str) -> Result<Value, ProviderError> {
        Ok(json!({
            "location": {"name": city},
            "current": {"temp_c": 18.0, "condition": {"text": "Sunny"}}
        }))
    }
}

pub(crate) struct EmptySocial;

#[async_trait]
impl SocialProvider for EmptySocial {
    async fn user_timeline(
        &self,
        username: &str,
        _max_results: u32,
    ) -> Result<UserTimeline, ProviderError> {
        Err(ProviderError::NotFound(format!("User @{username} not found")))
    }

    async fn search_recent(
        &self,
        _query: &str,
        _max_results: u32,
        _sort_order: SortOrder,
    ) -> Result<Vec<Post>, ProviderError> {
        Ok(Vec::new())
    }

    async fn trends(&self, _woeid: i64) -> Result<TrendList, ProviderError> {
        Err(ProviderError::missing_env("X_API_KEY"))
    }
}

pub(crate) fn toolbox(flights: Vec<FlightOffer>) -> Arc<ToolBox> {
    Arc::new(ToolBox::new(
        Arc::new(FixedFlights(flights)),
        Arc::new(FixedWeather),
        Arc::new(EmptySocial),
    ))
}
