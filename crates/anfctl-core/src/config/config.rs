//! Configuration management for the pool-change sample
//!
//! Handles loading the sample settings from a TOML file, expanding
//! environment variables, validating sizes and names, and writing a template.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::{ConfigError, Result};
use crate::netapp::models::{MIN_POOL_SIZE, MIN_VOLUME_SIZE, ServiceLevel};
use crate::netapp::rest::{DEFAULT_API_VERSION, DEFAULT_ENDPOINT};
use crate::poller::{DEFAULT_INTERVAL, DEFAULT_MAX_ATTEMPTS, PollSettings};
use crate::resource::ResourceHandle;

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Azure subscription that owns the resource group
    pub subscription_id: String,
    /// Resource group; must exist before running the sample
    pub resource_group: String,
    #[serde(default = "default_location")]
    pub location: String,
    /// Delegated subnet id for the volume
    pub subnet_id: String,
    #[serde(default = "default_account_name")]
    pub account_name: String,
    #[serde(default = "default_volume_name")]
    pub volume_name: String,
    /// Size in bytes of both capacity pools
    #[serde(default = "default_pool_size")]
    pub pool_size: u64,
    /// Volume quota in bytes
    #[serde(default = "default_volume_size")]
    pub volume_size: u64,
    /// Delete everything once the pool change is done
    #[serde(default)]
    pub cleanup: bool,
    /// Pool the volume is created in
    #[serde(default = "default_primary_pool")]
    pub primary_pool: PoolConfig,
    /// Pool the volume is moved to
    #[serde(default = "default_secondary_pool")]
    pub secondary_pool: PoolConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub poll: PollConfig,
}

/// A capacity pool to create
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PoolConfig {
    pub name: String,
    pub service_level: ServiceLevel,
}

/// Management endpoint settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Bearer token, usually `${AZURE_ACCESS_TOKEN}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_version: default_api_version(),
            token: None,
        }
    }
}

impl ApiConfig {
    /// The token to send, if any
    ///
    /// An empty value or an unexpanded `${VAR}` reference counts as no token.
    pub fn bearer_token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && !t.starts_with("${"))
    }
}

/// Polling budget for every wait
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct PollConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_secs: default_interval_secs(),
        }
    }
}

impl PollConfig {
    pub fn settings(&self) -> PollSettings {
        PollSettings::new(self.max_attempts, Duration::from_secs(self.interval_secs))
    }
}

impl Config {
    /// Template written by `anfctl init`
    pub fn template() -> Self {
        Self {
            subscription_id: "${AZURE_SUBSCRIPTION_ID}".to_string(),
            resource_group: "<Resource Group Name>".to_string(),
            location: default_location(),
            subnet_id: "<subnet ID>".to_string(),
            account_name: default_account_name(),
            volume_name: default_volume_name(),
            pool_size: default_pool_size(),
            volume_size: default_volume_size(),
            cleanup: false,
            primary_pool: default_primary_pool(),
            secondary_pool: default_secondary_pool(),
            api: ApiConfig {
                token: Some("${AZURE_ACCESS_TOKEN}".to_string()),
                ..ApiConfig::default()
            },
            poll: PollConfig::default(),
        }
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Err(ConfigError::NotFound {
                path: config_path.display().to_string(),
            });
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration text, expanding environment variables first
    pub fn from_toml(content: &str) -> Result<Self> {
        let expanded_content = Self::expand_env_vars(content);
        let config: Config = toml::from_str(&expanded_content)?;
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        // Create parent directories if they don't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Check the settings the service would otherwise reject mid-run
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("subscription_id", &self.subscription_id),
            ("resource_group", &self.resource_group),
            ("location", &self.location),
            ("subnet_id", &self.subnet_id),
            ("account_name", &self.account_name),
            ("volume_name", &self.volume_name),
            ("primary_pool.name", &self.primary_pool.name),
            ("secondary_pool.name", &self.secondary_pool.name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("'{field}' must not be empty")));
            }
            if value.contains("${") || value.starts_with('<') {
                return Err(ConfigError::Invalid(format!(
                    "'{field}' still holds a placeholder: {value}"
                )));
            }
        }

        let id_segments = [
            ("subscription_id", &self.subscription_id),
            ("resource_group", &self.resource_group),
            ("account_name", &self.account_name),
            ("volume_name", &self.volume_name),
            ("primary_pool.name", &self.primary_pool.name),
            ("secondary_pool.name", &self.secondary_pool.name),
        ];
        for (field, value) in id_segments {
            if value.contains('/') {
                return Err(ConfigError::Invalid(format!(
                    "'{field}' must be a single name without '/': {value}"
                )));
            }
        }

        if self.primary_pool.name == self.secondary_pool.name {
            return Err(ConfigError::Invalid(format!(
                "primary and secondary pools are both named '{}'",
                self.primary_pool.name
            )));
        }
        if self.pool_size < MIN_POOL_SIZE {
            return Err(ConfigError::Invalid(format!(
                "pool_size {} is below the 4 TiB minimum ({MIN_POOL_SIZE})",
                self.pool_size
            )));
        }
        if self.volume_size < MIN_VOLUME_SIZE {
            return Err(ConfigError::Invalid(format!(
                "volume_size {} is below the 100 GiB minimum ({MIN_VOLUME_SIZE})",
                self.volume_size
            )));
        }
        if self.volume_size > self.pool_size {
            return Err(ConfigError::Invalid(format!(
                "volume_size {} exceeds pool_size {}",
                self.volume_size, self.pool_size
            )));
        }

        Ok(())
    }

    pub fn account_id(&self) -> ResourceHandle {
        ResourceHandle::account(&self.subscription_id, &self.resource_group, &self.account_name)
    }

    pub fn pool_id(&self, pool: &PoolConfig) -> ResourceHandle {
        ResourceHandle::pool(
            &self.subscription_id,
            &self.resource_group,
            &self.account_name,
            &pool.name,
        )
    }

    /// The volume as created, i.e. inside the primary pool
    pub fn volume_id(&self) -> ResourceHandle {
        ResourceHandle::volume(
            &self.subscription_id,
            &self.resource_group,
            &self.account_name,
            &self.primary_pool.name,
            &self.volume_name,
        )
    }

    /// Get the path to the configuration file
    ///
    /// On Linux: ~/.config/anfctl/config.toml
    /// On macOS: ~/Library/Application Support/com.anfctl.anfctl/config.toml
    /// On Windows: %APPDATA%\anfctl\anfctl\config\config.toml
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("com", "anfctl", "anfctl").ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand environment variables in configuration content
    ///
    /// Supports ${VAR} and ${VAR:-default} syntax. Unset variables without a
    /// default are left as written.
    ///
    /// Example:
    /// ```toml
    /// subscription_id = "${AZURE_SUBSCRIPTION_ID}"
    /// location = "${ANF_LOCATION:-westus}"
    /// ```
    fn expand_env_vars(content: &str) -> String {
        let expanded =
            shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok());
        expanded.to_string()
    }
}

fn default_location() -> String {
    "westus".to_string()
}

fn default_account_name() -> String {
    "anftestaccount".to_string()
}

fn default_volume_name() -> String {
    "anftestvolume".to_string()
}

fn default_pool_size() -> u64 {
    MIN_POOL_SIZE
}

fn default_volume_size() -> u64 {
    MIN_VOLUME_SIZE
}

fn default_primary_pool() -> PoolConfig {
    PoolConfig {
        name: "anfprimarypool".to_string(),
        service_level: ServiceLevel::Premium,
    }
}

fn default_secondary_pool() -> PoolConfig {
    PoolConfig {
        name: "anfsecondarypool".to_string(),
        service_level: ServiceLevel::Standard,
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL.as_secs()
}
