use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::util::paths::config_path;

/// Default import service endpoint
pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:7412/import";
/// How long the success message stays up before the workflow resets
pub const DEFAULT_CLEAR_DELAY: Duration = Duration::from_secs(3);

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub workflow: WorkflowConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Endpoint that receives import requests
    pub url: String,
    /// Request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_GATEWAY_URL.to_string(),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Delay between a successful import and the automatic clear
    pub clear_delay: Duration,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            clear_delay: DEFAULT_CLEAR_DELAY,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlGatewayConfig {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlWorkflowConfig {
    pub clear_delay_ms: Option<u64>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub gateway: Option<TomlGatewayConfig>,
    pub workflow: Option<TomlWorkflowConfig>,
}

impl Config {
    /// Load from the default location, falling back to defaults when the
    /// file is missing or invalid
    pub fn load() -> Self {
        let config_file = config_path();
        if !config_file.exists() {
            return Config::default();
        }

        match Self::from_file(&config_file) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    path = %config_file.display(),
                    error = %e,
                    "Ignoring invalid config file"
                );
                Config::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Overlay TOML settings on top of the defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let toml_config: TomlConfig = toml::from_str(contents)?;
        let mut config = Config::default();

        if let Some(gateway) = toml_config.gateway {
            if let Some(url) = gateway.url {
                config.gateway.url = url;
            }
            if let Some(secs) = gateway.timeout_secs {
                config.gateway.timeout = Some(Duration::from_secs(secs));
            }
        }

        if let Some(workflow) = toml_config.workflow {
            if let Some(ms) = workflow.clear_delay_ms {
                config.workflow.clear_delay = Duration::from_millis(ms);
            }
        }

        Ok(config)
    }
}
