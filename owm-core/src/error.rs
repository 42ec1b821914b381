use std::path::PathBuf;

use thiserror::Error;

/// Problems loading, saving or applying device configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown init key '{0}'. Supported keys: api_key, city_id.")]
    UnknownKey(String),

    #[error("Could not determine platform config directory")]
    NoConfigDir,

    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize configuration to TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// A single fetch from the weather API failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to OpenWeather failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("OpenWeather request failed with status {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("Failed to parse OpenWeather current JSON: {0}")]
    Decode(String),
}

/// Why an update did not replace the stored reading.
///
/// Every variant leaves the previous reading and pending events untouched.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("Device is not configured: api_key and city_id are required")]
    Unconfigured,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Weather unchanged since {0}")]
    Unchanged(i64),
}
