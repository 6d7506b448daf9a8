use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, error, info, warn};

use super::decision::RoutingDecision;
use super::prompts;
use crate::application::conversation::ConversationStore;
use crate::application::text::summarise;
use crate::application::tooling::ToolBox;
use crate::application::worker::{Worker, WorkerDescriptor, WorkerError};
use crate::config::{AppConfig, RouterConfig};
use crate::infrastructure::model::{ModelError, ModelProvider, ModelRequest};

/// Final answer for one message and how it was routed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOutcome {
    pub response: String,
    pub decision: RoutingDecision,
}

/// Owns the workers and the conversation store; one instance serves every
/// conversation.
pub struct Orchestrator<P: ModelProvider> {
    provider: Arc<P>,
    workers: Vec<Worker<P>>,
    store: Arc<ConversationStore>,
    settings: RouterConfig,
}

impl<P: ModelProvider> Orchestrator<P> {
    pub fn new(
        provider: Arc<P>,
        workers: Vec<Worker<P>>,
        store: Arc<ConversationStore>,
        settings: RouterConfig,
    ) -> Self {
        Self {
            provider,
            workers,
            store,
            settings,
        }
    }

    /// Build the router and every configured worker over one provider and toolbox.
    pub fn from_config(config: &AppConfig, provider: Arc<P>, toolbox: Arc<ToolBox>) -> Self {
        let workers = config
            .workers
            .iter()
            .map(|worker| {
                Worker::new(
                    WorkerDescriptor::from(worker),
                    provider.clone(),
                    toolbox.clone(),
                    config.router.max_tool_iterations,
                )
            })
            .collect();
        Self::new(
            provider,
            workers,
            Arc::new(ConversationStore::new()),
            config.router.clone(),
        )
    }

    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }

    pub fn worker_names(&self) -> Vec<&str> {
        self.workers.iter().map(Worker::name).collect()
    }

    pub async fn route(&self, conversation_id: &str, message: &str) -> String {
        self.route_detailed(conversation_id, message).await.response
    }

    /// Handle one message end to end. Messages for the same conversation are
    /// processed one at a time.
    pub async fn route_detailed(&self, conversation_id: &str, message: &str) -> RouteOutcome {
        let _guard = self.store.acquire(conversation_id).await;
        info!(
            conversation = %conversation_id,
            message = %summarise(message),
            "Routing message"
        );

        let context = self
            .store
            .recent(conversation_id, self.settings.history_window)
            .await;
        let decision = self.classify(message, &context).await;
        info!(conversation = %conversation_id, decision = ?decision, "Routing decision");

        let response = match &decision {
            RoutingDecision::Fallback => self.fallback(message, &context).await,
            RoutingDecision::Single(name) => match self.worker(name) {
                Some(worker) => worker.process(message, Some(&context)).await,
                None => self.fallback(message, &context).await,
            },
            RoutingDecision::Parallel(names) => self.parallel(names, message, &context).await,
        };

        self.store
            .append_exchange(conversation_id, message, &response)
            .await;
        debug!(
            conversation = %conversation_id,
            response = %summarise(&response),
            "Recorded exchange"
        );

        RouteOutcome { response, decision }
    }

    /// Clear a conversation once any in-flight message for it has finished.
    pub async fn clear(&self, conversation_id: &str) -> bool {
        let guard = self.store.acquire(conversation_id).await;
        let cleared = self.store.clear(conversation_id).await;
        self.store.release(conversation_id, guard).await;
        info!(conversation = %conversation_id, cleared, "Cleared conversation history");
        cleared
    }

    pub async fn active_conversations(&self) -> usize {
        self.store.active_conversations().await
    }

    fn worker(&self, name: &str) -> Option<&Worker<P>> {
        self.workers.iter().find(|worker| worker.name() == name)
    }

    async fn classify(&self, message: &str, context: &str) -> RoutingDecision {
        let roster: Vec<(&str, &str)> = self
            .workers
            .iter()
            .map(|worker| {
                let descriptor = worker.descriptor();
                (descriptor.name.as_str(), descriptor.description.as_str())
            })
            .collect();
        let prompt = prompts::classification(&roster, context, message);

        match self.complete(prompt).await {
            Ok(answer) => {
                debug!(answer = %summarise(&answer), "Classifier answered");
                RoutingDecision::parse(&answer, &self.worker_names())
            }
            Err(err) => {
                warn!(error = %err, "Classification failed, using fallback");
                RoutingDecision::Fallback
            }
        }
    }

    async fn parallel(&self, names: &[String], message: &str, context: &str) -> String {
        info!(workers = %names.join(", "), "Dispatching workers in parallel");
        let timeout = self.settings.worker_timeout_secs;

        let tasks = names.iter().filter_map(|name| self.worker(name)).map(|worker| async move {
            let result = match timeout {
                Some(seconds) => tokio::time::timeout(
                    Duration::from_secs(seconds),
                    worker.try_process(message, Some(context)),
                )
                .await
                .unwrap_or(Err(WorkerError::Timeout { seconds })),
                None => worker.try_process(message, Some(context)).await,
            };
            (worker.name().to_string(), result)
        });

        let outputs: Vec<String> = join_all(tasks)
            .await
            .into_iter()
            .map(|(name, result)| match result {
                Ok(text) => format!("{name}: {text}"),
                Err(err) => {
                    warn!(worker = name.as_str(), error = %err, "Worker failed during parallel dispatch");
                    format!("{name}: Error - {}", err.user_message())
                }
            })
            .collect();

        let prompt = prompts::synthesis(&self.settings.judge_persona, context, message, &outputs);
        match self.complete(prompt).await {
            Ok(text) => text,
            Err(err) => {
                error!(error = %err, "Synthesis failed, returning raw worker outputs");
                format!(
                    "Processed with {} workers. Results:\n\n{}",
                    outputs.len(),
                    outputs.join("\n\n")
                )
            }
        }
    }

    async fn fallback(&self, message: &str, context: &str) -> String {
        let prompt = prompts::fallback(&self.settings.fallback_persona, context, message);
        match self.complete(prompt).await {
            Ok(text) => text,
            Err(err) => {
                error!(error = %err, "Fallback response failed");
                format!(
                    "I encountered an error while processing your request: {}",
                    err.user_message()
                )
            }
        }
    }

    /// One tool-less completion with the router model.
    async fn complete(&self, prompt: String) -> Result<String, ModelError> {
        let request = ModelRequest::prompt(
            self.settings.provider.clone(),
            self.settings.model.clone(),
            prompt,
        );
        self.provider
            .chat(request)
            .await
            .map(|response| response.message.content)
    }
}
