use serde::{Deserialize, Serialize};
use std::path::Path;

use super::auth::AuthConfig;
use super::dns::DnsConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::relay::RelayConfig;
use super::server::ServerConfig;

const LOCAL_CONFIG: &str = "uniproxy.toml";
const SYSTEM_CONFIG: &str = "/etc/uniproxy/config.toml";

/// Main configuration structure for uniproxy
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener (bind address, port)
    #[serde(default)]
    pub server: ServerConfig,

    /// Name resolution for upstream hosts
    #[serde(default)]
    pub dns: DnsConfig,

    #[serde(default)]
    pub relay: RelayConfig,

    /// Proxy users; empty disables authentication
    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. uniproxy.toml in current directory
    /// 3. /etc/uniproxy/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path.or_else(|| Self::get_config_path()) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(server) = overrides.dns_server {
            self.dns.server = server;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.verbose {
            self.relay.verbose = true;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("Proxy port cannot be 0".to_string()));
        }

        if self.relay.buffer_size == 0 {
            return Err(ConfigError::Validation(
                "Relay buffer size cannot be 0".to_string(),
            ));
        }

        self.dns
            .endpoint()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if self.auth.users.keys().any(|user| user.contains(':')) {
            return Err(ConfigError::Validation(
                "Proxy user names cannot contain ':'".to_string(),
            ));
        }

        if !["text", "json"]
            .iter()
            .any(|format| self.logging.format.eq_ignore_ascii_case(format))
        {
            return Err(ConfigError::Validation(format!(
                "Unknown log format '{}' (expected text or json)",
                self.logging.format
            )));
        }

        Ok(())
    }

    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, toml_string).map_err(|e| ConfigError::FileWrite {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    pub fn get_config_path() -> Option<&'static str> {
        [LOCAL_CONFIG, SYSTEM_CONFIG]
            .into_iter()
            .find(|candidate| Path::new(candidate).exists())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub dns_server: Option<String>,
    pub log_level: Option<String>,
    pub verbose: bool,
}
