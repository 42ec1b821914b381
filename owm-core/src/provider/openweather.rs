use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    error::FetchError,
    model::{OwCurrentResponse, Reading},
};

use super::{FetchedWeather, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const TIMEOUT: Duration = Duration::from_secs(5);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the provider at another API root, e.g. a mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { base_url: base_url.into(), http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self, api_key))]
    async fn fetch_current(&self, api_key: &str, city_id: &str) -> Result<FetchedWeather, FetchError> {
        let url = format!("{}/weather", self.base_url.trim_end_matches('/'));

        let res = self
            .http
            .get(&url)
            .query(&[("APPID", api_key), ("id", city_id), ("units", "metric"), ("lang", "ru")])
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = res.status();
        let body = res.text().await.map_err(FetchError::Transport)?;

        if !status.is_success() {
            return Err(FetchError::Status { status, body: truncate_body(&body) });
        }

        debug!(%status, len = body.len(), "received current weather");
        decode_current(&body)
    }
}

/// Decode a response body into a complete reading plus the raw payload.
pub fn decode_current(body: &str) -> Result<FetchedWeather, FetchError> {
    let raw: serde_json::Value =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    let parsed =
        OwCurrentResponse::deserialize(&raw).map_err(|e| FetchError::Decode(e.to_string()))?;

    let reading = Reading::from_response(&parsed)
        .ok_or_else(|| FetchError::Decode("response contained no weather condition".to_string()))?;

    Ok(FetchedWeather { reading, raw })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
