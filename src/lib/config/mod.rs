pub mod app;
pub mod defaults;
pub mod error;
pub mod loader;
pub mod provider;
pub mod server;
pub mod tools;
pub mod worker;

/// Default config file path - can be overridden via CLI argument
pub const CONFIG_PATH: &str = "config/flub.toml";

pub use app::AppConfig;
pub use error::ConfigError;
pub use provider::ModelProviderConfig;
pub use server::ServerConfig;
pub use tools::ToolsConfig;
pub use worker::{RouterConfig, WorkerConfig};
