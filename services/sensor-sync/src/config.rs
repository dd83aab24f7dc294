//! Configuration types for the sensor sync layer

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::num::NonZeroU32;
use std::path::Path;
use std::time::Duration;

/// Page size used when neither the caller nor the config names one
pub const DEFAULT_LIMIT: NonZeroU32 = NonZeroU32::new(5).unwrap();

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base of every resource URL, e.g. `http://home-sensor.home/api`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_limit")]
    pub default_limit: NonZeroU32,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default)]
    pub health_policy: HealthPolicy,
    #[serde(default = "default_resources")]
    pub resources: Vec<ResourceConfig>,
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            default_limit: default_limit(),
            request_timeout_seconds: default_request_timeout(),
            health_policy: HealthPolicy::default(),
            resources: default_resources(),
            devices: Vec::new(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Reject configurations that could never sync anything
    pub fn validate(&self) -> crate::Result<()> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(crate::SyncError::Config(format!(
                "api_base_url must start with http:// or https://, got '{}'",
                self.api_base_url
            )));
        }
        if self.request_timeout_seconds == 0 {
            return Err(crate::SyncError::Config(
                "request_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        let mut resource_names = HashSet::new();
        for resource in &self.resources {
            if resource.name.is_empty() {
                return Err(crate::SyncError::Config(
                    "resource name must not be empty".to_string(),
                ));
            }
            if resource.polling_interval_seconds == 0 {
                return Err(crate::SyncError::Config(format!(
                    "resource '{}' has a zero polling interval",
                    resource.name
                )));
            }
            if !resource_names.insert(resource.name.as_str()) {
                return Err(crate::SyncError::Config(format!(
                    "resource '{}' is configured more than once",
                    resource.name
                )));
            }
        }
        let mut device_names = HashSet::new();
        for device in &self.devices {
            if device.name.is_empty() || device.hostname.is_empty() {
                return Err(crate::SyncError::Config(
                    "device name and hostname must not be empty".to_string(),
                ));
            }
            if device.polling_interval_seconds == 0 {
                return Err(crate::SyncError::Config(format!(
                    "device '{}' has a zero polling interval",
                    device.name
                )));
            }
            if !device_names.insert(device.name.as_str()) {
                return Err(crate::SyncError::Config(format!(
                    "device '{}' is configured more than once",
                    device.name
                )));
            }
        }
        Ok(())
    }
}

/// Which health responses count as healthy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthPolicy {
    /// Only the literal `Ok` body
    Strict,
    /// `Ok`, or an object whose `status` is `Ok`
    #[default]
    Permissive,
}

/// A REST collection kept in sync for a view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub name: String,
    #[serde(default)]
    pub limit: Option<NonZeroU32>,
    #[serde(default)]
    pub offset: u32,
    #[serde(default = "default_resource_polling_interval")]
    pub polling_interval_seconds: u64,
}

impl ResourceConfig {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            limit: None,
            offset: 0,
            polling_interval_seconds: default_resource_polling_interval(),
        }
    }
}

/// A device probed through its own `/health` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub name: String,
    pub hostname: String,
    #[serde(default = "default_health_polling_interval")]
    pub polling_interval_seconds: u64,
}

fn default_api_base_url() -> String {
    "http://home-sensor.home/api".to_string()
}

fn default_limit() -> NonZeroU32 {
    DEFAULT_LIMIT
}

fn default_request_timeout() -> u64 {
    10
}

fn default_resources() -> Vec<ResourceConfig> {
    ["stations", "sensors", "measurements"]
        .into_iter()
        .map(ResourceConfig::named)
        .collect()
}

fn default_resource_polling_interval() -> u64 {
    30
}

fn default_health_polling_interval() -> u64 {
    10
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::SyncError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
