//! Daily readings sampled from the emulated sensor
//!
//! For each day of the configured month the sensor is driven to a random
//! value, the raw TEMP and HUMID registers are read back and decoded, and the
//! result is truncated into a [`Reading`] stamped with that day's midnight.

use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;
use tracing::debug;

use crate::date::{calendar_date, to_unix_timestamp, DateError};
use crate::registers::{
    decode_humidity, decode_temperature, sampleable_bounds, IoModule, RegisterError,
    SensorRangeError, HUMID_REG, TEMP_REG,
};
use crate::{Reading, ReadingTree};

/// Errors raised while sampling readings.
#[derive(Debug, Error)]
pub enum SamplingError {
    /// Register access failed
    #[error("register access failed: {0}")]
    Register(#[from] RegisterError),

    /// A sampled day is not a calendar date
    #[error("invalid sampling date: {0}")]
    Date(#[from] DateError),

    /// A temperature or humidity range cannot be sampled
    #[error("invalid sensor range: {0}")]
    Range(#[from] SensorRangeError),
}

/// Parameters for one month of simulated readings.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingConfig {
    /// Temperature range in degrees C (bounds in either order)
    pub temp_range: RangeInclusive<f32>,

    /// Relative humidity range in percent (bounds in either order)
    pub humid_range: RangeInclusive<f32>,

    /// Month sampled (1..=12)
    pub month: u32,

    /// Year sampled
    pub year: i32,

    /// One reading per day for days `1..=days`
    pub days: u32,

    /// Shuffle readings before building a tree
    pub shuffle: bool,

    /// Seed for the shuffle; `None` seeds from OS entropy
    pub shuffle_seed: Option<u64>,
}

impl Default for SamplingConfig {
    /// Thirty days of November 2024, 42 to 52 C, 72.6 to 87.3 %RH, shuffled.
    fn default() -> Self {
        Self {
            temp_range: 42.0..=52.0,
            humid_range: 72.6..=87.3,
            month: 11,
            year: 2024,
            days: 30,
            shuffle: true,
            shuffle_seed: None,
        }
    }
}

impl SamplingConfig {
    /// Sample `days` consecutive days starting on the 1st of `month`/`year`.
    pub fn for_month(month: u32, year: i32, days: u32) -> Self {
        Self {
            month,
            year,
            days,
            ..Self::default()
        }
    }

    /// Override the temperature and humidity ranges
    pub fn with_ranges(mut self, temp: RangeInclusive<f32>, humid: RangeInclusive<f32>) -> Self {
        self.temp_range = temp;
        self.humid_range = humid;
        self
    }

    /// Use a fixed shuffle seed
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    /// Insert readings in day order instead of shuffling
    pub fn unshuffled(mut self) -> Self {
        self.shuffle = false;
        self
    }

    fn validate(&self) -> Result<(), SamplingError> {
        for (what, range) in [("temperature", &self.temp_range), ("humidity", &self.humid_range)] {
            sampleable_bounds(what, *range.start(), *range.end())?;
        }
        // The last sampled day must exist in the month.
        if self.days > 0 {
            calendar_date(self.month, self.days, self.year)?;
        }
        Ok(())
    }
}

/// Sample one reading per configured day, in day order.
pub fn collect_readings(
    io: &mut IoModule,
    config: &SamplingConfig,
) -> Result<Vec<Reading>, SamplingError> {
    config.validate()?;

    let base = io.base();
    let mut readings = Vec::with_capacity(config.days as usize);

    for day in 1..=config.days {
        let timestamp = to_unix_timestamp(config.month, day, config.year)?;

        io.set_sensor_random(config.temp_range.clone(), config.humid_range.clone())?;
        let temp = decode_temperature(io.read_reg(base, TEMP_REG)?);
        let humid = decode_humidity(io.read_reg(base, HUMID_REG)?);

        readings.push(Reading::from_measurement(timestamp, temp, humid));
    }

    debug!(
        count = readings.len(),
        month = config.month,
        year = config.year,
        "collected readings"
    );
    Ok(readings)
}

/// Uniformly permute readings in place.
pub fn shuffle_readings(readings: &mut [Reading], seed: Option<u64>) {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    readings.shuffle(&mut rng);
}

/// Sample, optionally shuffle, and insert everything into a new tree.
pub fn build_tree(io: &mut IoModule, config: &SamplingConfig) -> Result<ReadingTree, SamplingError> {
    let mut readings = collect_readings(io, config)?;
    if config.shuffle {
        shuffle_readings(&mut readings, config.shuffle_seed);
    }
    Ok(ReadingTree::from_readings(readings))
}
