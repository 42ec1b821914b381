use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::Reading;

/// Names of the events the device emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventName {
    Temperature,
    Humidity,
    Pressure,
    WindSpeed,
    WindDirection,
    Weather,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::Temperature => "temperature",
            EventName::Humidity => "humidity",
            EventName::Pressure => "pressure",
            EventName::WindSpeed => "wind_speed",
            EventName::WindDirection => "wind_direction",
            EventName::Weather => "weather",
        }
    }

    /// Events advertised to the host. `Weather` is emitted but not listed.
    pub const fn advertised() -> &'static [EventName] {
        &[
            EventName::Temperature,
            EventName::Humidity,
            EventName::Pressure,
            EventName::WindSpeed,
            EventName::WindDirection,
        ]
    }
}

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventValue {
    Number(f64),
    Text(String),
}

impl EventValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            EventValue::Number(n) => Some(*n),
            EventValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            EventValue::Number(_) => None,
            EventValue::Text(s) => Some(s),
        }
    }
}

/// Events produced by one changed update. Handed out once.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct EventBatch(BTreeMap<EventName, EventValue>);

impl EventBatch {
    /// Build the batch for a freshly applied reading. `raw` is the payload
    /// as received, already serialized.
    pub fn from_reading(reading: &Reading, raw: String) -> Self {
        let mut events = BTreeMap::new();
        events.insert(EventName::Temperature, EventValue::Number(reading.temperature));
        events.insert(EventName::Humidity, EventValue::Number(reading.humidity));
        events.insert(EventName::Pressure, EventValue::Number(reading.pressure));
        events.insert(EventName::WindSpeed, EventValue::Number(reading.wind_speed));
        events.insert(EventName::WindDirection, EventValue::Number(reading.wind_direction_deg));
        events.insert(EventName::Weather, EventValue::Text(raw));
        Self(events)
    }

    pub fn get(&self, name: EventName) -> Option<&EventValue> {
        self.0.get(&name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EventName, &EventValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }
}
