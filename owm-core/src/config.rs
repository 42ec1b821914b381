use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::ConfigError;

pub const DEFAULT_HWID: &str = "owm-current";

/// The two init values the device needs before it can fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_id: Option<String>,
}

impl DeviceConfig {
    /// Labels of the init fields, in the order a host should prompt for them.
    pub const FIELDS: &'static [(&'static str, &'static str)] =
        &[("api_key", "Ключ API"), ("city_id", "ID города")];

    /// Set one init value by key. Unknown keys are rejected and nothing is stored.
    pub fn apply(&mut self, key: &str, value: impl Into<String>) -> Result<(), ConfigError> {
        match key {
            "api_key" => self.api_key = Some(value.into()),
            "city_id" => self.city_id = Some(value.into()),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Both values, if both are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let api_key = self.api_key.as_deref().filter(|s| !s.is_empty())?;
        let city_id = self.city_id.as_deref().filter(|s| !s.is_empty())?;
        Some((api_key, city_id))
    }

    pub fn is_complete(&self) -> bool {
        self.credentials().is_some()
    }

    /// Current values as key/value pairs; unset fields are omitted.
    pub fn values(&self) -> Vec<(&'static str, String)> {
        [("api_key", &self.api_key), ("city_id", &self.city_id)]
            .into_iter()
            .filter_map(|(k, v)| v.clone().map(|v| (k, v)))
            .collect()
    }
}

/// Top-level configuration stored on disk by the CLI host.
///
/// Example TOML:
/// ```toml
/// hwid = "owm-current"
/// base_url = "https://api.openweathermap.org/data/2.5"
///
/// [device]
/// api_key = "..."
/// city_id = "524901"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_hwid")]
    pub hwid: String,

    /// Overrides the OpenWeather API root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default)]
    pub device: DeviceConfig,
}

fn default_hwid() -> String {
    DEFAULT_HWID.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self { hwid: default_hwid(), base_url: None, device: DeviceConfig::default() }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;

        toml::from_str(&contents)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| ConfigError::Io { path: parent.to_path_buf(), source })?;
        }

        let toml = toml::to_string_pretty(self)?;

        fs::write(path, toml).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("dev", "owm-current", "owm-current")
            .ok_or(ConfigError::NoConfigDir)?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
