use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {source}")]
    Parse {
        #[source]
        source: toml::de::Error,
    },

    #[error("no providers configured - at least one [[providers]] entry is required")]
    NoProvidersConfigured,

    #[error("no workers configured - at least one [[workers]] entry is required")]
    NoWorkersConfigured,

    #[error("provider '{provider}' is referenced but not configured")]
    ProviderNotFound { provider: String },

    #[error("provider '{provider}' is missing required field 'endpoint'")]
    MissingEndpoint { provider: String },

    #[error("worker name '{name}' is invalid: {reason}")]
    InvalidWorkerName { name: String, reason: String },

    #[error("worker '{name}' is configured more than once")]
    DuplicateWorker { name: String },

    #[error("worker '{worker}' declares unknown tool '{tool}'")]
    UnknownTool { worker: String, tool: String },

    #[error("invalid value for '{field}': {reason}")]
    InvalidSetting { field: &'static str, reason: String },
}
