use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::*;
use crate::application::conversation::{ConversationStore, NO_PREVIOUS_CONVERSATION};
use crate::application::test_support::{StubModel, last_content, toolbox};
use crate::application::worker::{Worker, WorkerDescriptor};
use crate::config::RouterConfig;
use crate::infrastructure::model::{
    ModelError, ModelProvider, ModelRequest, ModelResponse,
};
use crate::types::TurnRole;

const ROUTER_MODEL: &str = "router-model";

fn settings() -> RouterConfig {
    RouterConfig {
        provider: "stub".to_string(),
        model: ROUTER_MODEL.to_string(),
        ..RouterConfig::default()
    }
}

fn worker<P: ModelProvider>(name: &str, model: &str, provider: Arc<P>) -> Worker<P> {
    Worker::new(
        WorkerDescriptor {
            name: name.to_string(),
            description: format!("{name} specialist"),
            persona: format!("You are {name}."),
            provider: "stub".to_string(),
            model: model.to_string(),
            tools: Vec::new(),
            mcp_servers: Vec::new(),
        },
        provider,
        toolbox(Vec::new()),
        10,
    )
}

fn orchestrator<P: ModelProvider>(provider: Arc<P>, timeout: Option<u64>) -> Orchestrator<P> {
    let workers = vec![
        worker("WEATHER", "weather-model", provider.clone()),
        worker("FLIGHTS", "flights-model", provider.clone()),
        worker("SOCIAL", "social-model", provider.clone()),
    ];
    Orchestrator::new(
        provider,
        workers,
        Arc::new(ConversationStore::new()),
        RouterConfig {
            worker_timeout_secs: timeout,
            ..settings()
        },
    )
}

fn is_classification(request: &ModelRequest) -> bool {
    request.model == ROUTER_MODEL && last_content(request).starts_with("Analyze this message")
}

fn is_synthesis(request: &ModelRequest) -> bool {
    request.model == ROUTER_MODEL && last_content(request).contains("Worker responses:")
}

/// Classifier answers `route`; workers answer with their model name.
fn model_with_route(route: &'static str) -> StubModel {
    StubModel::new(move |request| {
        if is_classification(request) {
            Ok(ModelResponse::new(route))
        } else if is_synthesis(request) {
            Ok(ModelResponse::new("synthesized answer"))
        } else if request.model == ROUTER_MODEL {
            Ok(ModelResponse::new("fallback answer"))
        } else {
            Ok(ModelResponse::new(format!("answer from {}", request.model)))
        }
    })
}

fn models_called(model: &StubModel) -> Vec<String> {
    model
        .requests()
        .iter()
        .map(|request| request.model.clone())
        .collect()
}

#[test]
fn decision_parsing_normalises_and_filters() {
    let known = ["WEATHER", "FLIGHTS", "SOCIAL"];
    assert_eq!(
        RoutingDecision::parse(" weather ", &known),
        RoutingDecision::Single("WEATHER".into())
    );
    assert_eq!(
        RoutingDecision::parse("WEATHER, flights", &known),
        RoutingDecision::Parallel(vec!["WEATHER".into(), "FLIGHTS".into()])
    );
    assert_eq!(
        RoutingDecision::parse("FLIGHTS,FLIGHTS,HOTELS", &known),
        RoutingDecision::Single("FLIGHTS".into())
    );
    assert_eq!(RoutingDecision::parse("UNKNOWN", &known), RoutingDecision::Fallback);
    assert_eq!(RoutingDecision::parse("", &known), RoutingDecision::Fallback);
    assert_eq!(
        RoutingDecision::parse("\"SOCIAL\".", &known),
        RoutingDecision::Single("SOCIAL".into())
    );
}

#[tokio::test]
async fn single_worker_answers_directly() {
    let model = Arc::new(model_with_route("WEATHER"));
    let router = orchestrator(model.clone(), None);

    let outcome = router.route_detailed("+15550100", "Is it sunny in Denver?").await;
    assert_eq!(outcome.decision, RoutingDecision::Single("WEATHER".into()));
    assert_eq!(outcome.response, "answer from weather-model");
    assert_eq!(models_called(&model), vec![ROUTER_MODEL, "weather-model"]);

    let turns = router.store().turns("+15550100").await;
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, TurnRole::User);
    assert_eq!(turns[1].content, "answer from weather-model");
}

#[tokio::test]
async fn classification_prompt_lists_workers_and_prior_context() {
    let model = Arc::new(model_with_route("UNKNOWN"));
    let router = orchestrator(model.clone(), None);

    router.route("a", "first question").await;
    router.route("a", "second question").await;

    let classifications: Vec<ModelRequest> = model
        .requests()
        .into_iter()
        .filter(is_classification)
        .collect();
    assert_eq!(classifications.len(), 2);

    let first = last_content(&classifications[0]);
    assert!(first.contains("- WEATHER: WEATHER specialist"));
    assert!(first.contains("- SOCIAL: SOCIAL specialist"));
    assert!(first.contains(NO_PREVIOUS_CONVERSATION));
    assert!(first.contains("Current user message: first question"));

    let second = last_content(&classifications[1]);
    assert!(second.contains("USER: first question\nASSISTANT: fallback answer"));
    assert!(!second.contains("USER: second question"));
}

#[tokio::test]
async fn parallel_dispatch_synthesizes_one_answer() {
    let model = Arc::new(model_with_route("WEATHER,FLIGHTS"));
    let router = orchestrator(model.clone(), None);

    let outcome = router.route_detailed("a", "Flights to Denver and the weather there").await;
    assert_eq!(
        outcome.decision,
        RoutingDecision::Parallel(vec!["WEATHER".into(), "FLIGHTS".into()])
    );
    assert_eq!(outcome.response, "synthesized answer");

    let requests = model.requests();
    let synthesis: Vec<&ModelRequest> = requests.iter().filter(|r| is_synthesis(r)).collect();
    assert_eq!(synthesis.len(), 1);
    let prompt = last_content(synthesis[0]);
    assert!(prompt.contains("WEATHER: answer from weather-model"));
    assert!(prompt.contains("FLIGHTS: answer from flights-model"));
    assert!(prompt.contains("Original user request: Flights to Denver and the weather there"));
    assert!(!models_called(&model).contains(&"social-model".to_string()));
}

#[tokio::test]
async fn one_failing_worker_does_not_sink_the_batch() {
    let model = Arc::new(StubModel::new(|request| {
        if is_classification(request) {
            Ok(ModelResponse::new("WEATHER,FLIGHTS"))
        } else if is_synthesis(request) {
            Ok(ModelResponse::new(last_content(request).to_string()))
        } else if request.model == "flights-model" {
            Err(ModelError::invalid_response("stub", "boom"))
        } else {
            Ok(ModelResponse::new("Sunny, 21C"))
        }
    }));
    let router = orchestrator(model, None);

    let response = router.route("a", "weather and flights").await;
    assert!(response.contains("WEATHER: Sunny, 21C"), "{response}");
    assert!(response.contains("FLIGHTS: Error - "), "{response}");
}

#[tokio::test]
async fn synthesis_failure_returns_raw_outputs() {
    let model = Arc::new(StubModel::new(|request| {
        if is_classification(request) {
            Ok(ModelResponse::new("WEATHER,SOCIAL"))
        } else if is_synthesis(request) {
            Err(ModelError::invalid_response("stub", "overloaded"))
        } else {
            Ok(ModelResponse::new(format!("answer from {}", request.model)))
        }
    }));
    let router = orchestrator(model, None);

    let response = router.route("a", "storms and trending delays").await;
    assert_eq!(
        response,
        "Processed with 2 workers. Results:\n\n\
         WEATHER: answer from weather-model\n\n\
         SOCIAL: answer from social-model"
    );
}

#[tokio::test]
async fn classification_errors_use_the_fallback() {
    let model = Arc::new(StubModel::new(|request| {
        if is_classification(request) {
            Err(ModelError::invalid_response("stub", "no route"))
        } else {
            Ok(ModelResponse::new("fallback answer"))
        }
    }));
    let router = orchestrator(model.clone(), None);

    let outcome = router.route_detailed("a", "hello there").await;
    assert_eq!(outcome.decision, RoutingDecision::Fallback);
    assert_eq!(outcome.response, "fallback answer");
    let requests = model.requests();
    assert!(last_content(&requests[1]).starts_with("You are a helpful assistant."));
    assert!(requests[1].tools.is_empty());
}

#[tokio::test]
async fn fallback_failure_is_reported_as_text() {
    let model = Arc::new(StubModel::new(|request| {
        if is_classification(request) {
            Ok(ModelResponse::new("UNKNOWN"))
        } else {
            Err(ModelError::missing_api_key("stub"))
        }
    }));
    let router = orchestrator(model, None);

    let response = router.route("a", "hello").await;
    assert!(
        response.starts_with("I encountered an error while processing your request: "),
        "{response}"
    );
    assert_eq!(router.store().turns("a").await.len(), 2);
}

#[tokio::test]
async fn clear_resets_context_and_active_count() {
    let model = Arc::new(model_with_route("UNKNOWN"));
    let router = orchestrator(model.clone(), None);

    router.route("a", "remember me").await;
    router.route("b", "hi").await;
    assert_eq!(router.active_conversations().await, 2);

    assert!(router.clear("a").await);
    assert!(!router.clear("a").await);
    assert_eq!(router.active_conversations().await, 1);

    router.route("a", "do you remember?").await;
    let last_classification = model
        .requests()
        .into_iter()
        .filter(is_classification)
        .last()
        .expect("classification request");
    assert!(last_content(&last_classification).contains(NO_PREVIOUS_CONVERSATION));
}

#[tokio::test]
async fn clearing_unknown_conversations_does_not_grow_the_store() {
    let router = orchestrator(Arc::new(model_with_route("UNKNOWN")), None);
    router.route("a", "hi").await;

    for n in 0..100 {
        assert!(!router.clear(&format!("nobody-{n}")).await);
    }
    assert_eq!(router.store().gate_count().await, 1);

    assert!(router.clear("a").await);
    assert_eq!(router.store().gate_count().await, 0);
}

#[tokio::test]
async fn same_conversation_messages_do_not_interleave() {
    let model = Arc::new(model_with_route("UNKNOWN"));
    let router = Arc::new(orchestrator(model, None));

    let first = {
        let router = router.clone();
        tokio::spawn(async move { router.route("a", "one").await })
    };
    let second = {
        let router = router.clone();
        tokio::spawn(async move { router.route("a", "two").await })
    };
    first.await.expect("first task");
    second.await.expect("second task");

    let turns = router.store().turns("a").await;
    assert_eq!(turns.len(), 4);
    for pair in turns.chunks(2) {
        assert_eq!(pair[0].role, TurnRole::User);
        assert_eq!(pair[1].role, TurnRole::Assistant);
    }
}

/// Delays every completion for `slow_model` far beyond any test timeout.
struct SlowModel {
    inner: StubModel,
    slow_model: &'static str,
}

#[async_trait]
impl ModelProvider for SlowModel {
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        if request.model == self.slow_model {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        self.inner.chat(request).await
    }
}

#[tokio::test(start_paused = true)]
async fn slow_workers_time_out_during_parallel_dispatch() {
    let model = Arc::new(SlowModel {
        inner: StubModel::new(|request| {
            if is_classification(request) {
                Ok(ModelResponse::new("WEATHER,FLIGHTS"))
            } else if is_synthesis(request) {
                Ok(ModelResponse::new(last_content(request).to_string()))
            } else {
                Ok(ModelResponse::new(format!("answer from {}", request.model)))
            }
        }),
        slow_model: "flights-model",
    });
    let router = orchestrator(model, Some(5));

    let response = router.route("a", "weather and flights").await;
    assert!(response.contains("WEATHER: answer from weather-model"), "{response}");
    assert!(
        response.contains("FLIGHTS: Error - The worker did not respond within 5 seconds."),
        "{response}"
    );
}
