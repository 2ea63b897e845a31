//! Timestamped temperature/humidity sample.

use std::fmt;

/// One sensor sample keyed by its timestamp.
///
/// Temperature and humidity are stored as truncated integer magnitudes
/// (degrees C and %RH). Fractional precision is discarded when the reading is
/// built from a decoded register value, never rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reading {
    /// Seconds since the Unix epoch (may be negative).
    pub timestamp: i64,
    /// Temperature in whole degrees C.
    pub temperature: u32,
    /// Relative humidity in whole percent.
    pub humidity: u32,
}

impl Reading {
    /// Construct a reading from already-integral values.
    pub fn new(timestamp: i64, temperature: u32, humidity: u32) -> Self {
        Self {
            timestamp,
            temperature,
            humidity,
        }
    }

    /// Build a reading from physical values, truncating toward zero.
    ///
    /// Negative or NaN inputs saturate to 0.
    pub fn from_measurement(timestamp: i64, temperature_c: f32, humidity_pct: f32) -> Self {
        Self {
            timestamp,
            temperature: temperature_c as u32,
            humidity: humidity_pct as u32,
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Timestamp: {}, Temp: {}, Humid: {}",
            self.timestamp, self.temperature, self.humidity
        )
    }
}
