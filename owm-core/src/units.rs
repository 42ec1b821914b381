//! Unit conversions and compass bucketing for weather readings.

use serde::Serialize;

/// Convert a pressure in hectopascals to millimetres of mercury,
/// rounded to two decimals.
pub fn hpa_to_mmhg(hpa: f64) -> f64 {
    round_to(hpa * 76000.0 / 101325.0, 2)
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Eight-point compass bucket for a wind direction.
///
/// The buckets follow the historical device output, which labels
/// 22..68 degrees as north-west and 248..292 as east.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CompassPoint {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "NW")]
    NorthWest,
    #[serde(rename = "W")]
    West,
    #[serde(rename = "SW")]
    SouthWest,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "SE")]
    SouthEast,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "NE")]
    NorthEast,
}

impl CompassPoint {
    /// Bucket a direction in degrees. Lower bounds are inclusive;
    /// anything below 22 (including negatives and NaN) is north, as is 338 and up.
    pub fn from_degrees(deg: f64) -> Self {
        if deg.is_nan() || deg < 22.0 {
            CompassPoint::North
        } else if deg < 68.0 {
            CompassPoint::NorthWest
        } else if deg < 112.0 {
            CompassPoint::West
        } else if deg < 158.0 {
            CompassPoint::SouthWest
        } else if deg < 202.0 {
            CompassPoint::South
        } else if deg < 248.0 {
            CompassPoint::SouthEast
        } else if deg < 292.0 {
            CompassPoint::East
        } else if deg < 338.0 {
            CompassPoint::NorthEast
        } else {
            CompassPoint::North
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompassPoint::North => "N",
            CompassPoint::NorthWest => "NW",
            CompassPoint::West => "W",
            CompassPoint::SouthWest => "SW",
            CompassPoint::South => "S",
            CompassPoint::SouthEast => "SE",
            CompassPoint::East => "E",
            CompassPoint::NorthEast => "NE",
        }
    }

    /// Cyrillic abbreviation used by the rendered summary.
    pub fn as_ru_str(&self) -> &'static str {
        match self {
            CompassPoint::North => "С",
            CompassPoint::NorthWest => "СЗ",
            CompassPoint::West => "З",
            CompassPoint::SouthWest => "ЮЗ",
            CompassPoint::South => "Ю",
            CompassPoint::SouthEast => "ЮВ",
            CompassPoint::East => "В",
            CompassPoint::NorthEast => "СВ",
        }
    }

    pub const fn all() -> &'static [CompassPoint] {
        &[
            CompassPoint::North,
            CompassPoint::NorthWest,
            CompassPoint::West,
            CompassPoint::SouthWest,
            CompassPoint::South,
            CompassPoint::SouthEast,
            CompassPoint::East,
            CompassPoint::NorthEast,
        ]
    }
}

impl std::fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
