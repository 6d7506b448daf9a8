use super::CONFIG_PATH;
use super::app::AppConfig;
use super::defaults::UNKNOWN_WORKER;
use super::error::ConfigError;
use super::provider::{ModelProviderConfig, RawProviderConfig};
use super::server::{RawServerConfig, ServerConfig};
use super::tools::{RawToolsConfig, ToolsConfig};
use super::worker::{RawRouterConfig, RawWorkerConfig, RouterConfig, WorkerConfig};
use crate::application::tooling::ToolKind;
use dotenvy::{dotenv, from_filename};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Once;
use tracing::{debug, info};

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
pub(super) struct RawConfig {
    pub providers: Option<Vec<RawProviderConfig>>,
    #[serde(default)]
    pub router: RawRouterConfig,
    pub workers: Option<Vec<RawWorkerConfig>>,
    #[serde(default)]
    pub tools: RawToolsConfig,
    #[serde(default)]
    pub server: RawServerConfig,
}

/// Ensures environment variables are loaded from .env and config/.env
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        let _ = dotenv();
        let _ = from_filename("config/.env");
    });
}

/// Load and validate configuration from a file path.
///
/// An explicit path must exist. When no path is given, a missing default
/// file yields the built-in configuration.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();
    match path {
        Some(path) => read_config(path),
        None => {
            let default_path = Path::new(CONFIG_PATH);
            if default_path.exists() {
                read_config(default_path)
            } else {
                info!(path = CONFIG_PATH, "No configuration file found, using defaults");
                Ok(AppConfig::default())
            }
        }
    }
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    debug!(path = %path.display(), "Reading configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_config(&content)
}

pub(super) fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let parsed: RawConfig =
        toml::from_str(content).map_err(|source| ConfigError::Parse { source })?;
    validate_and_build(parsed)
}

fn validate_and_build(parsed: RawConfig) -> Result<AppConfig, ConfigError> {
    let mut providers = match parsed.providers {
        None => vec![ModelProviderConfig::builtin()],
        Some(raw) if raw.is_empty() => return Err(ConfigError::NoProvidersConfigured),
        Some(raw) => {
            let mut providers = Vec::with_capacity(raw.len());
            for raw_provider in raw {
                if raw_provider.endpoint.is_none() {
                    return Err(ConfigError::MissingEndpoint {
                        provider: raw_provider.id.clone(),
                    });
                }
                providers.push(ModelProviderConfig::from(raw_provider));
            }
            providers
        }
    };

    let router = build_router(parsed.router, &providers)?;

    let workers = match parsed.workers {
        None => WorkerConfig::defaults(&router.provider, &router.model),
        Some(raw) if raw.is_empty() => return Err(ConfigError::NoWorkersConfigured),
        Some(raw) => build_workers(raw, &router, &providers)?,
    };

    // Make sure every referenced model passes the provider allow-lists
    let references = std::iter::once((router.provider.as_str(), router.model.as_str()))
        .chain(
            workers
                .iter()
                .map(|worker| (worker.provider.as_str(), worker.model.as_str())),
        )
        .map(|(provider, model)| (provider.to_string(), model.to_string()))
        .collect::<Vec<_>>();
    for (provider_id, model) in references {
        if let Some(provider) = providers.iter_mut().find(|p| p.id == provider_id) {
            provider.ensure_model(&model);
        }
    }

    let server = ServerConfig::from(parsed.server);
    server.socket_addr()?;

    Ok(AppConfig {
        providers,
        router,
        workers,
        tools: ToolsConfig::from(parsed.tools),
        server,
    })
}

fn build_router(
    raw: RawRouterConfig,
    providers: &[ModelProviderConfig],
) -> Result<RouterConfig, ConfigError> {
    let defaults = RouterConfig::default();
    let provider = match raw.provider {
        Some(provider) => provider,
        None => providers
            .first()
            .map(|provider| provider.id.clone())
            .unwrap_or(defaults.provider),
    };
    ensure_provider(&provider, providers)?;

    let history_window = raw.history_window.unwrap_or(defaults.history_window);
    if history_window == 0 {
        return Err(ConfigError::InvalidSetting {
            field: "router.history_window",
            reason: "must be at least 1".to_string(),
        });
    }
    let max_tool_iterations = raw
        .max_tool_iterations
        .unwrap_or(defaults.max_tool_iterations);
    if max_tool_iterations == 0 {
        return Err(ConfigError::InvalidSetting {
            field: "router.max_tool_iterations",
            reason: "must be at least 1".to_string(),
        });
    }
    if raw.worker_timeout_secs == Some(0) {
        return Err(ConfigError::InvalidSetting {
            field: "router.worker_timeout_secs",
            reason: "must be at least 1 when set".to_string(),
        });
    }

    Ok(RouterConfig {
        provider,
        model: raw.model.unwrap_or(defaults.model),
        history_window,
        max_tool_iterations,
        worker_timeout_secs: raw.worker_timeout_secs,
        fallback_persona: raw.fallback_persona.unwrap_or(defaults.fallback_persona),
        judge_persona: raw.judge_persona.unwrap_or(defaults.judge_persona),
    })
}

fn build_workers(
    raw: Vec<RawWorkerConfig>,
    router: &RouterConfig,
    providers: &[ModelProviderConfig],
) -> Result<Vec<WorkerConfig>, ConfigError> {
    let builtins = WorkerConfig::defaults(&router.provider, &router.model);
    let mut seen = HashSet::new();
    let mut workers = Vec::with_capacity(raw.len());

    for raw_worker in raw {
        let name = normalize_worker_name(&raw_worker.name)?;
        if !seen.insert(name.clone()) {
            return Err(ConfigError::DuplicateWorker { name });
        }

        let provider = raw_worker
            .provider
            .unwrap_or_else(|| router.provider.clone());
        ensure_provider(&provider, providers)?;

        // Built-in worker names keep their tuned persona unless overridden
        let builtin = builtins.iter().find(|worker| worker.name == name);
        let description = if raw_worker.description.trim().is_empty() {
            builtin
                .map(|worker| worker.description.clone())
                .unwrap_or_default()
        } else {
            raw_worker.description
        };
        let persona = raw_worker
            .persona
            .filter(|persona| !persona.trim().is_empty())
            .or_else(|| builtin.map(|worker| worker.persona.clone()))
            .unwrap_or_else(|| generic_persona(&name, &description));

        let mut tools = Vec::with_capacity(raw_worker.tools.len());
        for tool in raw_worker.tools {
            let kind = ToolKind::from_name(&tool).ok_or_else(|| ConfigError::UnknownTool {
                worker: name.clone(),
                tool: tool.clone(),
            })?;
            if !tools.contains(&kind) {
                tools.push(kind);
            }
        }

        workers.push(WorkerConfig {
            name,
            description,
            persona,
            provider,
            model: raw_worker.model.unwrap_or_else(|| router.model.clone()),
            tools,
            mcp_servers: raw_worker.mcp_servers,
        });
    }

    Ok(workers)
}

fn normalize_worker_name(raw: &str) -> Result<String, ConfigError> {
    let name = raw.trim().to_uppercase();
    let invalid = |reason: &str| ConfigError::InvalidWorkerName {
        name: raw.to_string(),
        reason: reason.to_string(),
    };
    if name.is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if name.contains(',') {
        return Err(invalid("name must not contain commas"));
    }
    if name == UNKNOWN_WORKER {
        return Err(invalid("UNKNOWN is reserved for unclassified messages"));
    }
    Ok(name)
}

fn generic_persona(name: &str, description: &str) -> String {
    let mut persona = format!("You are {name}, a specialized worker agent.");
    if !description.trim().is_empty() {
        persona.push_str(&format!(" Your specialty: {}.", description.trim()));
    }
    persona.push_str(" Use the available tools to help the user with their request.");
    persona
}

fn ensure_provider(id: &str, providers: &[ModelProviderConfig]) -> Result<(), ConfigError> {
    if providers.iter().any(|provider| provider.id == id) {
        Ok(())
    } else {
        Err(ConfigError::ProviderNotFound {
            provider: id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_names_are_upper_cased() {
        assert_eq!(normalize_worker_name(" weather ").ok().as_deref(), Some("WEATHER"));
    }

    #[test]
    fn reserved_and_malformed_names_are_rejected() {
        for name in ["", "   ", "a,b", "unknown"] {
            assert!(
                matches!(
                    normalize_worker_name(name),
                    Err(ConfigError::InvalidWorkerName { .. })
                ),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn builtin_worker_names_keep_their_persona() {
        let config = parse_config(
            r#"
[[workers]]
name = "weather"
tools = ["check_weather"]

[[workers]]
name = "hotels"
description = "Finds hotel deals"
"#,
        )
        .expect("valid config");

        let weather = config.worker("WEATHER").expect("weather worker");
        assert_eq!(weather.persona, super::super::defaults::WEATHER_WORKER_PERSONA);
        assert!(!weather.description.is_empty());

        let hotels = config.worker("HOTELS").expect("hotels worker");
        assert!(hotels.persona.starts_with("You are HOTELS, a specialized worker agent."));
        assert!(hotels.persona.contains("Finds hotel deals"));
        assert!(hotels.tools.is_empty());
    }
}
