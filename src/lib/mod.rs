pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::{conversation, router, stdio, tooling, worker};
pub use cli::{Cli, RunMode};
pub use config::{AppConfig, ModelProviderConfig};
pub use domain::types;
pub use infrastructure::{model, providers, server};

use application::router::Orchestrator;
use application::tooling::ToolBox;
use infrastructure::model::DynamicModelProvider;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    init_tracing(cli.mode == RunMode::Chat);
    info!("Starting flub");
    debug!(mode = ?cli.mode, config = ?cli.config, addr = ?cli.addr, "CLI arguments parsed");

    let config = AppConfig::load(cli.config.as_deref())?;
    match cli.config.as_deref() {
        Some(path) => info!(path = %path.display(), "Loaded configuration from file"),
        None => info!("Loaded configuration from default path"),
    }
    debug!(
        providers = config.providers.len(),
        workers = config.workers.len(),
        "Initializing model providers and workers"
    );

    let provider = Arc::new(DynamicModelProvider::from_configs(&config.providers));
    let toolbox = Arc::new(ToolBox::from_config(&config.tools));
    let orchestrator = Arc::new(Orchestrator::from_config(&config, provider, toolbox));

    match cli.mode {
        RunMode::Serve => {
            let addr = match cli.addr {
                Some(addr) => addr,
                None => config.server.socket_addr()?,
            };
            info!(%addr, "Starting HTTP server");
            server::serve(orchestrator, addr, &config.server.cors_origins).await?;
        }
        RunMode::Chat => {
            info!("Launching interactive chat");
            stdio::run(orchestrator, &cli.sender).await?;
        }
    }
    info!("Execution finished");
    Ok(())
}

/// Install the global subscriber once. `RUST_LOG` wins when set; otherwise
/// chat mode only shows warnings so log lines do not interleave with the
/// conversation.
pub fn init_tracing(quiet: bool) {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        fmt()
            .with_env_filter(tracing_filter(quiet))
            .with_target(false)
            .with_level(true)
            .init();
    });
}

fn tracing_filter(quiet: bool) -> EnvFilter {
    let default = if quiet { "warn" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
