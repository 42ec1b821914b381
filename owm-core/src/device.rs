//! The current-weather device and the host-facing `Device` contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{collections::HashMap, fmt};
use tracing::{debug, warn};

use crate::{
    config::DeviceConfig,
    error::{ConfigError, UpdateError},
    event::{EventBatch, EventName},
    model::{DeviceState, Reading},
    provider::WeatherProvider,
};

pub const DESCRIPTION: &str = "Текущая погода с OpenWeatherMap.org";

const NO_DATA: &str = "Информация о погоде отсутствует";

/// What a smart-home host needs from a pluggable device.
///
/// The host creates the device, calls [`Device::init`] with the stored init
/// data, then calls [`Device::update`] on its own schedule and drains
/// [`Device::take_events`] after every successful update.
#[async_trait]
pub trait Device: Send + fmt::Display {
    fn hwid(&self) -> &str;

    fn description(&self) -> &'static str;

    /// Events the host should expect from this device.
    fn events_list(&self) -> &'static [EventName];

    /// Init fields and their human-readable labels.
    fn init_data_list(&self) -> &'static [(&'static str, &'static str)];

    fn init_data_values(&self) -> Vec<(&'static str, String)>;

    /// Set the device id and apply init data. Unrecognized keys are skipped.
    fn init(&mut self, hwid: &str, init_data: &HashMap<String, String>);

    /// Poll the source once. `true` only when a new reading was applied.
    async fn update(&mut self) -> bool;

    fn state(&self) -> Option<DeviceState>;

    /// Hand out the pending event batch, leaving none behind.
    fn take_events(&mut self) -> Option<EventBatch>;

    /// Unix timestamp of the applied reading, 0 before the first one.
    fn last_update(&self) -> i64;
}

/// Current conditions for one city, fetched through a [`WeatherProvider`].
#[derive(Debug)]
pub struct CurrentWeather<P> {
    hwid: String,
    config: DeviceConfig,
    provider: P,
    reading: Option<Reading>,
    events: Option<EventBatch>,
    updated: i64,
}

impl<P: WeatherProvider> CurrentWeather<P> {
    pub fn new(provider: P) -> Self {
        Self {
            hwid: String::new(),
            config: DeviceConfig::default(),
            provider,
            reading: None,
            events: None,
            updated: 0,
        }
    }

    pub fn with_config(provider: P, hwid: impl Into<String>, config: DeviceConfig) -> Self {
        let mut device = Self::new(provider);
        device.hwid = hwid.into();
        device.config = config;
        device
    }

    /// Like [`Device::init`], but fails on the first unrecognized key.
    /// Nothing is applied when any key is rejected.
    pub fn try_init(
        &mut self,
        hwid: &str,
        init_data: &HashMap<String, String>,
    ) -> Result<(), ConfigError> {
        let mut config = self.config.clone();
        for (key, value) in init_data {
            config.apply(key, value.as_str())?;
        }

        self.hwid = hwid.to_string();
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn reading(&self) -> Option<&Reading> {
        self.reading.as_ref()
    }

    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.reading.as_ref().and_then(Reading::observed_at)
    }

    /// Fetch once and apply the result if it is new.
    ///
    /// Returns the applied timestamp. On any error the stored reading and
    /// pending events are left as they were.
    pub async fn try_update(&mut self) -> Result<i64, UpdateError> {
        let (api_key, city_id) = self.config.credentials().ok_or(UpdateError::Unconfigured)?;

        let fetched = self.provider.fetch_current(api_key, city_id).await?;

        let timestamp = fetched.reading.timestamp;
        if timestamp == self.updated {
            return Err(UpdateError::Unchanged(timestamp));
        }

        let events = EventBatch::from_reading(&fetched.reading, fetched.raw_json());
        self.reading = Some(fetched.reading);
        self.events = Some(events);
        self.updated = timestamp;

        Ok(timestamp)
    }
}

#[async_trait]
impl<P: WeatherProvider> Device for CurrentWeather<P> {
    fn hwid(&self) -> &str {
        &self.hwid
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn events_list(&self) -> &'static [EventName] {
        EventName::advertised()
    }

    fn init_data_list(&self) -> &'static [(&'static str, &'static str)] {
        DeviceConfig::FIELDS
    }

    fn init_data_values(&self) -> Vec<(&'static str, String)> {
        self.config.values()
    }

    fn init(&mut self, hwid: &str, init_data: &HashMap<String, String>) {
        self.hwid = hwid.to_string();
        for (key, value) in init_data {
            if let Err(err) = self.config.apply(key, value.as_str()) {
                warn!(hwid, %err, "ignoring init value");
            }
        }
    }

    async fn update(&mut self) -> bool {
        match self.try_update().await {
            Ok(timestamp) => {
                debug!(hwid = %self.hwid, timestamp, "applied new reading");
                true
            }
            Err(UpdateError::Unchanged(timestamp)) => {
                debug!(hwid = %self.hwid, timestamp, "weather unchanged");
                false
            }
            Err(err) => {
                warn!(hwid = %self.hwid, %err, "update failed");
                false
            }
        }
    }

    fn state(&self) -> Option<DeviceState> {
        self.reading.as_ref().map(Reading::state)
    }

    fn take_events(&mut self) -> Option<EventBatch> {
        self.events.take()
    }

    fn last_update(&self) -> i64 {
        self.updated
    }
}

impl<P> fmt::Display for CurrentWeather<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(r) = &self.reading else {
            return f.write_str(NO_DATA);
        };

        write!(
            f,
            "{}({})&deg;C, {}%, {}&nbsp;мм.рт.ст., {}, ветер {} м/с, направление {} ({})",
            r.temperature,
            r.feels_like,
            r.humidity,
            r.pressure,
            r.description,
            r.wind_speed,
            r.wind_direction().as_ru_str(),
            r.wind_direction_deg,
        )
    }
}
