//! Heating season predicate: should the heating system be running this hour?
//!
//! The same predicate drives both the resistance estimate and the dispatch
//! simulation so the two never disagree about which hours needed heat.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::weather::TemperatureSample;

use super::types::AnalysisWindow;

/// A calendar day without a year, written `"MM-DD"` in configuration.
///
/// February 29 is rejected so that the day exists in every year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    pub const SEPTEMBER_15: MonthDay = MonthDay { month: 9, day: 15 };
    pub const JUNE_1: MonthDay = MonthDay { month: 6, day: 1 };

    /// Creates a month/day pair.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the day does not exist in a non-leap year.
    pub fn new(month: u32, day: u32) -> Result<Self, ConfigError> {
        if NaiveDate::from_ymd_opt(2001, month, day).is_none() {
            return Err(ConfigError {
                field: "month_day".into(),
                message: format!("{month:02}-{day:02} is not a valid calendar day"),
            });
        }
        Ok(Self { month, day })
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn day(self) -> u32 {
        self.day
    }

    /// The date of this day in `year`.
    pub fn in_year(self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

impl TryFrom<String> for MonthDay {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let invalid = || ConfigError {
            field: "month_day".into(),
            message: format!("expected \"MM-DD\", got \"{value}\""),
        };
        let (month, day) = value.trim().split_once('-').ok_or_else(invalid)?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        let day = day.parse::<u32>().map_err(|_| invalid())?;
        Self::new(month, day)
    }
}

impl From<MonthDay> for String {
    fn from(value: MonthDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// Thermostat setpoint and the annual on/off dates of the heating system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatingSeason {
    /// Indoor setpoint (°F).
    pub indoor_setpoint_f: f64,
    pub turn_on: MonthDay,
    pub turn_off: MonthDay,
}

impl HeatingSeason {
    pub fn new(indoor_setpoint_f: f64, turn_on: MonthDay, turn_off: MonthDay) -> Self {
        Self {
            indoor_setpoint_f,
            turn_on,
            turn_off,
        }
    }

    /// Year in which the heating season containing `date` was switched on.
    ///
    /// Dates on or before this calendar year's turn-off day belong to the
    /// season that started the previous year.
    pub fn heating_year(&self, date: NaiveDate) -> i32 {
        let year = date.year();
        match self.turn_off.in_year(year) {
            Some(off) if date <= off => year - 1,
            _ => year,
        }
    }

    /// Whether `date` lies within `[turn_on(Y), turn_off(Y + 1)]`, both
    /// days inclusive, for the heating year `Y` of `date`.
    pub fn in_season(&self, date: NaiveDate) -> bool {
        let year = self.heating_year(date);
        match (self.turn_on.in_year(year), self.turn_off.in_year(year + 1)) {
            (Some(on), Some(off)) => on <= date && date <= off,
            _ => false,
        }
    }

    /// Should the heating system run during sample `index`?
    ///
    /// True iff the hour is inside `window`, inside the heating season, and
    /// colder outside than the setpoint.
    pub fn is_heating(
        &self,
        samples: &[TemperatureSample],
        index: usize,
        window: &AnalysisWindow,
    ) -> bool {
        if !window.contains(index) {
            return false;
        }
        let Some(sample) = samples.get(index) else {
            return false;
        };
        self.in_season(sample.timestamp.date()) && sample.outdoor_temp_f < self.indoor_setpoint_f
    }

    /// Indoor/outdoor temperature difference for one sample (°F).
    pub fn delta_t(&self, sample: &TemperatureSample) -> f64 {
        self.indoor_setpoint_f - sample.outdoor_temp_f
    }
}
