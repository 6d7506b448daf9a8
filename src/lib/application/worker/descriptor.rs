use crate::application::tooling::ToolKind;
use crate::config::WorkerConfig;
use crate::infrastructure::model::ToolDefinition;

/// Immutable description of a worker, shared across all conversations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerDescriptor {
    pub name: String,
    /// One-line capability summary shown to the classifier
    pub description: String,
    pub persona: String,
    pub provider: String,
    pub model: String,
    pub tools: Vec<ToolKind>,
    pub mcp_servers: Vec<String>,
}

impl WorkerDescriptor {
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(ToolKind::definition).collect()
    }
}

impl From<&WorkerConfig> for WorkerDescriptor {
    fn from(config: &WorkerConfig) -> Self {
        Self {
            name: config.name.clone(),
            description: config.description.clone(),
            persona: config.persona.clone(),
            provider: config.provider.clone(),
            model: config.model.clone(),
            tools: config.tools.clone(),
            mcp_servers: config.mcp_servers.clone(),
        }
    }
}
