use std::path::Path;

use super::error::ConfigError;
use super::provider::ModelProviderConfig;
use super::server::ServerConfig;
use super::tools::ToolsConfig;
use super::worker::{RouterConfig, WorkerConfig};

/// Fully validated application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub providers: Vec<ModelProviderConfig>,
    pub router: RouterConfig,
    pub workers: Vec<WorkerConfig>,
    pub tools: ToolsConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from a file, or the default path when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        super::loader::parse_config(content)
    }

    pub fn worker(&self, name: &str) -> Option<&WorkerConfig> {
        self.workers
            .iter()
            .find(|worker| worker.name.eq_ignore_ascii_case(name))
    }

    pub fn provider(&self, id: &str) -> Option<&ModelProviderConfig> {
        self.providers.iter().find(|provider| provider.id == id)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let router = RouterConfig::default();
        let mut provider = ModelProviderConfig::builtin();
        provider.ensure_model(&router.model);
        Self {
            providers: vec![provider],
            workers: WorkerConfig::defaults(&router.provider, &router.model),
            router,
            tools: ToolsConfig::default(),
            server: ServerConfig::default(),
        }
    }
}
