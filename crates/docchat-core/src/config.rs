//! Configuration management for docchat
//!
//! Handles loading, saving, and resolving the client configuration: where the
//! document service lives and how the coordinator guards overlapping requests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable overriding the document service base address
pub const BACKEND_URL_ENV: &str = "DOCCHAT_BACKEND_URL";

/// Default configuration values
pub mod defaults {
    pub const BASE_ADDRESS: &str = "http://localhost:5000";
    pub const LOG_LEVEL: &str = "warn";

    pub fn user_agent() -> String {
        format!("docchat/{}", env!("CARGO_PKG_VERSION"))
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Document service connection settings
    #[serde(default)]
    pub service: ServiceConfig,
    /// Request guard settings
    #[serde(default)]
    pub coordinator: CoordinatorConfig,
    /// General application settings
    #[serde(default)]
    pub general: GeneralConfig,
}

impl Config {
    /// Apply the `DOCCHAT_BACKEND_URL` override, if set and non-empty
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                self.service.base_address = url;
            }
        }
    }

    /// Override the base address (CLI flag)
    pub fn with_base_address(mut self, base_address: impl Into<String>) -> Self {
        self.service.base_address = base_address.into();
        self
    }

    /// Check and normalize the configuration in place
    pub fn validate(&mut self) -> Result<()> {
        self.service.base_address = normalize_base_address(&self.service.base_address)?;
        Ok(())
    }
}

/// Document service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base address of the document service, e.g. `http://localhost:5000`
    pub base_address: String,
    /// Per-request timeout. Unset means requests run until the transport gives up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_address: defaults::BASE_ADDRESS.to_string(),
            request_timeout_secs: None,
            user_agent: defaults::user_agent(),
        }
    }
}

impl ServiceConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Coordinator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Reject a new request while one of the same family is pending.
    ///
    /// When false the busy flag is advisory only and the most recently issued
    /// request wins its result slot.
    pub exclusive: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self { exclusive: true }
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level used when no verbose flag is given
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::LOG_LEVEL.to_string(),
        }
    }
}

/// Validate an http(s) base address and strip trailing slashes
pub fn normalize_base_address(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| Error::Config(format!("Invalid base address '{}': {}", trimmed, e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(Error::Config(format!(
            "Base address must use http or https: {}",
            trimmed
        )));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Serialize a configuration as pretty TOML
pub fn to_toml(config: &Config) -> Result<String> {
    toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
}

/// Configuration manager for loading and saving config
pub struct ConfigManager {
    config_path: PathBuf,
    config: Config,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::with_path(config_path)
    }

    /// Create a config manager with a specific path
    pub fn with_path(config_path: PathBuf) -> Result<Self> {
        let config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            Config::default()
        };

        Ok(Self { config_path, config })
    }

    /// Get the default config path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not find config directory".to_string()))?;

        Ok(config_dir.join("docchat").join("config.toml"))
    }

    /// Load configuration from a file
    fn load_from_path(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Get the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get mutable access to configuration
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Resolve the effective configuration: file, then environment, then validation
    pub fn resolve(&self) -> Result<Config> {
        let mut config = self.config.clone();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Save the current configuration to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = to_toml(&self.config)?;

        std::fs::write(&self.config_path, content)
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Set the document service base address
    pub fn set_base_address(&mut self, base_address: impl Into<String>) {
        self.config.service.base_address = base_address.into();
    }
}
