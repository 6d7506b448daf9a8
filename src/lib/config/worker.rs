//! Router and worker settings.

use serde::Deserialize;

use super::defaults::{
    DEFAULT_FALLBACK_PERSONA, DEFAULT_HISTORY_WINDOW, DEFAULT_JUDGE_PERSONA,
    DEFAULT_MAX_TOOL_ITERATIONS, DEFAULT_MODEL, DEFAULT_PROVIDER_ID, FLIGHTS_WORKER_DESCRIPTION,
    FLIGHTS_WORKER_NAME, FLIGHTS_WORKER_PERSONA, SOCIAL_WORKER_DESCRIPTION, SOCIAL_WORKER_NAME,
    SOCIAL_WORKER_PERSONA, WEATHER_WORKER_DESCRIPTION, WEATHER_WORKER_NAME,
    WEATHER_WORKER_PERSONA,
};
use crate::application::tooling::ToolKind;

/// Settings of the router model that classifies, synthesizes and falls back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    pub provider: String,
    pub model: String,
    /// Number of most recent turns handed to workers as context
    pub history_window: usize,
    /// Completion rounds a worker may spend on tool calls before giving up
    pub max_tool_iterations: usize,
    /// Per-worker deadline during parallel dispatch
    pub worker_timeout_secs: Option<u64>,
    pub fallback_persona: String,
    pub judge_persona: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER_ID.to_string(),
            model: DEFAULT_MODEL.to_string(),
            history_window: DEFAULT_HISTORY_WINDOW,
            max_tool_iterations: DEFAULT_MAX_TOOL_ITERATIONS,
            worker_timeout_secs: None,
            fallback_persona: DEFAULT_FALLBACK_PERSONA.to_string(),
            judge_persona: DEFAULT_JUDGE_PERSONA.to_string(),
        }
    }
}

/// A specialist worker as configured; `name` is already upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub name: String,
    pub description: String,
    pub persona: String,
    pub provider: String,
    pub model: String,
    pub tools: Vec<ToolKind>,
    pub mcp_servers: Vec<String>,
}

impl WorkerConfig {
    /// The built-in WEATHER, SOCIAL and FLIGHTS workers on the given provider/model.
    pub fn defaults(provider: &str, model: &str) -> Vec<WorkerConfig> {
        let build = |name: &str, description: &str, persona: &str, tools: Vec<ToolKind>| {
            WorkerConfig {
                name: name.to_string(),
                description: description.to_string(),
                persona: persona.to_string(),
                provider: provider.to_string(),
                model: model.to_string(),
                tools,
                mcp_servers: Vec::new(),
            }
        };

        vec![
            build(
                WEATHER_WORKER_NAME,
                WEATHER_WORKER_DESCRIPTION,
                WEATHER_WORKER_PERSONA,
                vec![ToolKind::CheckWeather],
            ),
            build(
                SOCIAL_WORKER_NAME,
                SOCIAL_WORKER_DESCRIPTION,
                SOCIAL_WORKER_PERSONA,
                ToolKind::social().to_vec(),
            ),
            build(
                FLIGHTS_WORKER_NAME,
                FLIGHTS_WORKER_DESCRIPTION,
                FLIGHTS_WORKER_PERSONA,
                ToolKind::flights().to_vec(),
            ),
        ]
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub(super) struct RawRouterConfig {
    pub(super) provider: Option<String>,
    pub(super) model: Option<String>,
    pub(super) history_window: Option<usize>,
    pub(super) max_tool_iterations: Option<usize>,
    pub(super) worker_timeout_secs: Option<u64>,
    pub(super) fallback_persona: Option<String>,
    pub(super) judge_persona: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct RawWorkerConfig {
    pub(super) name: String,
    #[serde(default)]
    pub(super) description: String,
    pub(super) persona: Option<String>,
    pub(super) provider: Option<String>,
    pub(super) model: Option<String>,
    #[serde(default)]
    pub(super) tools: Vec<String>,
    #[serde(default)]
    pub(super) mcp_servers: Vec<String>,
}
