//! AHT20 temperature/humidity register encoding
//!
//! The emulated sensor reports 20-bit raw values:
//!   Temp(C) = (ST / 2^20) * 200 - 50
//!   RH(%)   = (SRH / 2^20) * 100

use rand::Rng;
use thiserror::Error;

/// Full-scale divisor of the 20-bit sensor values (2^20)
pub const SENSOR_FULL_SCALE: f32 = 1_048_576.0;

/// Raw temperature register value for a temperature in degrees C.
///
/// The fractional part of the scaled value is truncated.
pub fn encode_temperature(temp_c: f32) -> u32 {
    ((SENSOR_FULL_SCALE / 200.0) * (temp_c + 50.0)) as u32
}

/// Raw humidity register value for a relative humidity in percent.
pub fn encode_humidity(humid_pct: f32) -> u32 {
    ((SENSOR_FULL_SCALE / 100.0) * humid_pct) as u32
}

/// Degrees C represented by a raw temperature register value.
pub fn decode_temperature(raw: u32) -> f32 {
    (raw as f32 / SENSOR_FULL_SCALE) * 200.0 - 50.0
}

/// Percent RH represented by a raw humidity register value.
pub fn decode_humidity(raw: u32) -> f32 {
    (raw as f32 / SENSOR_FULL_SCALE) * 100.0
}

/// A synthetic sensor range that cannot be sampled uniformly.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("{what} range {low}..={high} cannot be sampled")]
pub struct SensorRangeError {
    /// "temperature" or "humidity"
    pub what: &'static str,
    /// Lower bound as given
    pub low: f32,
    /// Upper bound as given
    pub high: f32,
}

/// Order `a` and `b`, rejecting NaN, infinite bounds and spans too wide for
/// `f32` arithmetic.
pub fn sampleable_bounds(what: &'static str, a: f32, b: f32) -> Result<(f32, f32), SensorRangeError> {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    // The uniform sampler rescales the span slightly upward, so leave headroom.
    let span = high - low;
    if !(low.is_finite() && high.is_finite() && (span * 2.0).is_finite()) {
        return Err(SensorRangeError { what, low: a, high: b });
    }
    Ok((low, high))
}

/// Uniform value between `a` and `b` inclusive; the bounds may come in either order.
pub fn random_in_range<R: Rng + ?Sized>(
    rng: &mut R,
    what: &'static str,
    a: f32,
    b: f32,
) -> Result<f32, SensorRangeError> {
    let (low, high) = sampleable_bounds(what, a, b)?;
    Ok(rng.gen_range(low..=high))
}
