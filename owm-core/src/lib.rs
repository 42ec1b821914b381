//! Core library for the OpenWeatherMap current-weather device.
//!
//! This crate defines:
//! - Init data and on-disk configuration
//! - The OpenWeather provider and its wire model
//! - Unit conversions and compass bucketing
//! - The `CurrentWeather` device behind the host `Device` contract
//!
//! It is used by `owm-cli`, but any host that drives `Device` can embed it.

pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod model;
pub mod provider;
pub mod units;

pub use config::{Config, DeviceConfig};
pub use device::{CurrentWeather, Device};
pub use error::{ConfigError, FetchError, UpdateError};
pub use event::{EventBatch, EventName, EventValue};
pub use model::{DeviceState, Reading};
pub use provider::{FetchedWeather, OpenWeatherProvider, WeatherProvider};
pub use units::CompassPoint;
