use crate::application::router::Orchestrator;
use crate::infrastructure::model::ModelProvider;
use std::sync::Arc;

/// Shared handler state: the orchestrator owning workers and histories
pub struct ServerState<P: ModelProvider> {
    orchestrator: Arc<Orchestrator<P>>,
}

impl<P: ModelProvider> ServerState<P> {
    pub fn new(orchestrator: Arc<Orchestrator<P>>) -> Self {
        Self { orchestrator }
    }

    pub fn orchestrator(&self) -> &Arc<Orchestrator<P>> {
        &self.orchestrator
    }
}
