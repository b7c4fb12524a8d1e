//! Outdoor temperature record.

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One hourly outdoor temperature reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSample {
    pub timestamp: NaiveDateTime,
    /// Outdoor dry-bulb temperature (°F).
    pub outdoor_temp_f: f64,
}

impl TemperatureSample {
    pub fn new(timestamp: NaiveDateTime, outdoor_temp_f: f64) -> Self {
        Self {
            timestamp,
            outdoor_temp_f,
        }
    }
}

/// Resamples irregular readings onto a whole-hour grid.
///
/// The grid starts at the hour containing the first reading and ends at the
/// hour containing the last one. Each hour carries the most recent reading
/// taken at or before it, so gaps hold the last known value until a new
/// reading's time is reached.
///
/// # Errors
///
/// Returns `Error::Data` if `readings` is empty, out of order, or contains a
/// non-finite temperature.
pub fn forward_fill_hourly(readings: &[TemperatureSample]) -> Result<Vec<TemperatureSample>> {
    let (Some(first), Some(last)) = (readings.first(), readings.last()) else {
        return Err(Error::data("temperature record is empty"));
    };
    validate_readings(readings)?;

    let mut hour = floor_to_hour(first.timestamp);
    let end = floor_to_hour(last.timestamp);
    let mut samples = Vec::with_capacity(((end - hour).num_hours() + 1).max(0) as usize);
    let mut next = 0;
    let mut current = first.outdoor_temp_f;

    while hour <= end {
        while next < readings.len() && readings[next].timestamp <= hour {
            current = readings[next].outdoor_temp_f;
            next += 1;
        }
        samples.push(TemperatureSample::new(hour, current));
        hour += Duration::hours(1);
    }
    Ok(samples)
}

/// Checks that a sample series is non-empty, ordered, and finite.
///
/// # Errors
///
/// Returns `Error::Data` describing the first offending sample.
pub fn validate_samples(samples: &[TemperatureSample]) -> Result<()> {
    if samples.is_empty() {
        return Err(Error::data("temperature record is empty"));
    }
    validate_readings(samples)
}

fn validate_readings(readings: &[TemperatureSample]) -> Result<()> {
    for (i, reading) in readings.iter().enumerate() {
        if !reading.outdoor_temp_f.is_finite() {
            return Err(Error::data(format!(
                "temperature at {} is not a finite number",
                reading.timestamp
            )));
        }
        if i > 0 && reading.timestamp < readings[i - 1].timestamp {
            return Err(Error::data(format!(
                "temperature readings out of order at {}",
                reading.timestamp
            )));
        }
    }
    Ok(())
}

fn floor_to_hour(ts: NaiveDateTime) -> NaiveDateTime {
    ts.date()
        .and_hms_opt(ts.hour(), 0, 0)
        .unwrap_or(ts)
}
