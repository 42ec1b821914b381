use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::FetchError, model::Reading};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// One decoded "current weather" response.
#[derive(Debug, Clone)]
pub struct FetchedWeather {
    pub reading: Reading,
    /// The payload exactly as decoded, including fields the reading ignores.
    pub raw: serde_json::Value,
}

impl FetchedWeather {
    /// The raw payload as compact JSON. Non-ASCII text is written as-is.
    pub fn raw_json(&self) -> String {
        self.raw.to_string()
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current(&self, api_key: &str, city_id: &str) -> Result<FetchedWeather, FetchError>;
}
