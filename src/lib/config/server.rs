use std::net::SocketAddr;

use serde::Deserialize;

use super::defaults::DEFAULT_BIND;
use super::error::ConfigError;

/// HTTP surface settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|err: std::net::AddrParseError| ConfigError::InvalidSetting {
                field: "server.bind",
                reason: format!("'{}' is not a socket address: {err}", self.bind),
            })
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub(super) struct RawServerConfig {
    bind: Option<String>,
    #[serde(default)]
    cors_origins: Vec<String>,
}

impl From<RawServerConfig> for ServerConfig {
    fn from(raw: RawServerConfig) -> Self {
        Self {
            bind: raw.bind.unwrap_or_else(|| DEFAULT_BIND.to_string()),
            cors_origins: raw.cors_origins,
        }
    }
}
