// Config loading tests - AppConfig::load from disk and validation errors.

use flub_agent::config::{AppConfig, ConfigError};
use flub_agent::tooling::ToolKind;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("flub.toml");
    fs::write(&path, content).expect("Failed to write config");
    path
}

#[test]
fn returns_error_when_file_not_found() {
    let result = AppConfig::load(Some(Path::new("/nonexistent/path/flub.toml")));
    assert!(matches!(result, Err(ConfigError::NotFound { .. })));
}

#[test]
fn empty_file_yields_builtin_workers() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "");

    let config = AppConfig::load(Some(&path)).expect("empty config is valid");
    let names: Vec<&str> = config.workers.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, ["WEATHER", "SOCIAL", "FLIGHTS"]);
    assert_eq!(config.router.provider, "dedalus");
    assert_eq!(config.router.history_window, 10);
    assert_eq!(config.router.max_tool_iterations, 10);
    assert_eq!(config.server.bind, "0.0.0.0:3000");
    assert_eq!(
        config.worker("weather").map(|w| w.tools.clone()),
        Some(vec![ToolKind::CheckWeather])
    );
}

#[test]
fn loads_custom_router_and_workers() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[[providers]]
id = "claude"
type = "anthropic"
endpoint = "https://api.anthropic.com"
api_key = "ANTHROPIC_API_KEY"

[router]
model = "claude-sonnet-4"
history_window = 4
worker_timeout_secs = 30

[[workers]]
name = "flights"
tools = ["search_flights", "compare_flights", "search_flights"]

[server]
bind = "127.0.0.1:8081"
cors_origins = ["http://localhost:5173"]
"#,
    );

    let config = AppConfig::load(Some(&path)).expect("valid config");
    assert_eq!(config.router.provider, "claude");
    assert_eq!(config.router.history_window, 4);
    assert_eq!(config.router.worker_timeout_secs, Some(30));

    let flights = config.worker("FLIGHTS").expect("flights worker");
    assert_eq!(flights.provider, "claude");
    assert_eq!(flights.model, "claude-sonnet-4");
    assert_eq!(
        flights.tools,
        vec![ToolKind::SearchFlights, ToolKind::CompareFlights]
    );
    assert!(config.provider("claude").is_some_and(|p| p.is_anthropic()));
    assert_eq!(
        config.server.socket_addr().map(|addr| addr.port()).ok(),
        Some(8081)
    );
}

#[test]
fn rejects_unknown_tool_names() {
    let result = AppConfig::from_toml_str(
        r#"
[[workers]]
name = "weather"
tools = ["check_weather", "book_hotel"]
"#,
    );
    assert!(matches!(
        result,
        Err(ConfigError::UnknownTool { ref worker, ref tool }) if worker == "WEATHER" && tool == "book_hotel"
    ));
}

#[test]
fn rejects_duplicate_workers_case_insensitively() {
    let result = AppConfig::from_toml_str(
        r#"
[[workers]]
name = "Weather"

[[workers]]
name = "WEATHER"
"#,
    );
    assert!(matches!(result, Err(ConfigError::DuplicateWorker { .. })));
}

#[test]
fn rejects_workers_on_unknown_provider() {
    let result = AppConfig::from_toml_str(
        r#"
[[workers]]
name = "weather"
provider = "missing"
"#,
    );
    assert!(matches!(result, Err(ConfigError::ProviderNotFound { .. })));
}

#[test]
fn rejects_empty_worker_and_provider_lists() {
    assert!(matches!(
        AppConfig::from_toml_str("workers = []"),
        Err(ConfigError::NoWorkersConfigured)
    ));
    assert!(matches!(
        AppConfig::from_toml_str("providers = []"),
        Err(ConfigError::NoProvidersConfigured)
    ));
}

#[test]
fn rejects_out_of_range_router_settings() {
    for snippet in [
        "[router]\nhistory_window = 0",
        "[router]\nmax_tool_iterations = 0",
        "[router]\nworker_timeout_secs = 0",
        "[server]\nbind = \"not an address\"",
    ] {
        assert!(
            matches!(
                AppConfig::from_toml_str(snippet),
                Err(ConfigError::InvalidSetting { .. })
            ),
            "{snippet} should be rejected"
        );
    }
}

#[test]
fn rejects_malformed_toml() {
    assert!(matches!(
        AppConfig::from_toml_str("[router\nmodel = 1"),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn bundled_sample_config_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/flub.toml");
    let config = AppConfig::load(Some(&path)).expect("sample config is valid");
    assert_eq!(config.workers.len(), 3);
    assert!(
        config
            .worker("SOCIAL")
            .is_some_and(|w| w.tools.contains(&ToolKind::TrendingTopics))
    );
}
