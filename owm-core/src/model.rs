use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::units::{CompassPoint, hpa_to_mmhg, round_to};

/// Subset of the OpenWeatherMap "current weather" payload the device reads.
#[derive(Debug, Clone, Deserialize)]
pub struct OwCurrentResponse {
    pub dt: i64,
    pub main: OwMain,
    pub weather: Vec<OwWeather>,
    pub wind: OwWind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
    /// Hectopascals.
    pub pressure: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwWeather {
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwWind {
    pub speed: f64,
    pub deg: f64,
}

/// A fully populated snapshot of current conditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    /// Observation time, unix seconds.
    pub timestamp: i64,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    /// Millimetres of mercury, two decimals.
    pub pressure: f64,
    pub description: String,
    pub wind_speed: f64,
    pub wind_direction_deg: f64,
}

impl Reading {
    /// Build a reading from a decoded payload. Returns `None` when the
    /// payload carries no weather condition entry.
    pub fn from_response(resp: &OwCurrentResponse) -> Option<Self> {
        let description = resp.weather.first()?.description.clone();

        Some(Self {
            timestamp: resp.dt,
            temperature: resp.main.temp,
            feels_like: resp.main.feels_like,
            humidity: resp.main.humidity,
            pressure: hpa_to_mmhg(resp.main.pressure),
            description,
            wind_speed: resp.wind.speed,
            wind_direction_deg: resp.wind.deg,
        })
    }

    pub fn wind_direction(&self) -> CompassPoint {
        CompassPoint::from_degrees(self.wind_direction_deg)
    }

    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// Display-ready values for the host.
    pub fn state(&self) -> DeviceState {
        DeviceState {
            temperature: round_to(self.temperature, 1),
            temp_feels_like: round_to(self.feels_like, 1),
            humidity: self.humidity.round() as i64,
            pressure: self.pressure,
            description: self.description.clone(),
            wind_speed: self.wind_speed,
            wind_direction: self.wind_direction_deg,
            wind_direction_string: self.wind_direction(),
        }
    }
}

/// What the host shows for the device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceState {
    pub temperature: f64,
    pub temp_feels_like: f64,
    pub humidity: i64,
    pub pressure: f64,
    pub description: String,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub wind_direction_string: CompassPoint,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"coord":{"lon":37.62,"lat":55.76},"weather":[{"id":503,"main":"Rain","description":"очень сильный дождь","icon":"10d"}],"base":"stations","main":{"temp":22.38,"feels_like":20.92,"temp_min":20.56,"temp_max":25,"pressure":1011,"humidity":60},"visibility":10000,"wind":{"speed":4,"deg":190},"rain":{"1h":44.96},"clouds":{"all":40},"dt":1593699165,"sys":{"type":1,"id":9027,"country":"RU","sunrise":1593651041,"sunset":1593713773},"timezone":10800,"id":524925,"name":"Moscow Oblast","cod":200}"#;

    #[test]
    fn parses_full_payload_and_ignores_extra_fields() {
        let resp: OwCurrentResponse = serde_json::from_str(SAMPLE).expect("sample must parse");
        let reading = Reading::from_response(&resp).expect("sample has a condition");

        assert_eq!(reading.timestamp, 1593699165);
        assert_eq!(reading.temperature, 22.38);
        assert_eq!(reading.humidity, 60.0);
        assert_eq!(reading.pressure, 758.31);
        assert_eq!(reading.description, "очень сильный дождь");
        assert_eq!(reading.wind_direction(), CompassPoint::South);
    }

    #[test]
    fn missing_field_fails_to_decode() {
        let body = r#"{"dt":1,"main":{"temp":1,"feels_like":1,"humidity":1},"weather":[],"wind":{"speed":1,"deg":1}}"#;
        assert!(serde_json::from_str::<OwCurrentResponse>(body).is_err());
    }

    #[test]
    fn empty_condition_list_yields_no_reading() {
        let body = r#"{"dt":1,"main":{"temp":1,"feels_like":1,"humidity":1,"pressure":1000},"weather":[],"wind":{"speed":1,"deg":1}}"#;
        let resp: OwCurrentResponse = serde_json::from_str(body).expect("payload must parse");
        assert!(Reading::from_response(&resp).is_none());
    }

    #[test]
    fn state_rounds_for_display() {
        let reading = Reading {
            timestamp: 1000,
            temperature: 20.04,
            feels_like: 19.46,
            humidity: 55.5,
            pressure: 760.0,
            description: "clear".into(),
            wind_speed: 3.2,
            wind_direction_deg: 200.0,
        };

        let state = reading.state();
        assert_eq!(state.temperature, 20.0);
        assert_eq!(state.temp_feels_like, 19.5);
        assert_eq!(state.humidity, 56);
        assert_eq!(state.wind_direction_string, CompassPoint::South);
    }

    #[test]
    fn observed_at_is_utc() {
        let resp: OwCurrentResponse = serde_json::from_str(SAMPLE).expect("sample must parse");
        let reading = Reading::from_response(&resp).expect("sample has a condition");
        let at = reading.observed_at().expect("valid timestamp");
        assert_eq!(at.timestamp(), 1593699165);
    }
}
