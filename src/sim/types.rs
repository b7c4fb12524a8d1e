//! Core analysis types: inputs, window, per-hour records, and run results.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::ElectricityConfig;
use crate::error::{Error, Result};
use crate::fuel::FuelProfile;

use super::season::HeatingSeason;

/// One fuel delivery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelPurchase {
    pub date: NaiveDate,
    /// Delivered volume in fuel units (gallons, SCF, ...).
    pub volume: f64,
    /// Amount paid for the delivery.
    pub cost: f64,
}

impl FuelPurchase {
    pub fn new(date: NaiveDate, volume: f64, cost: f64) -> Self {
        Self { date, volume, cost }
    }
}

/// Checks that deliveries are non-empty, date-ordered, and non-negative.
///
/// # Errors
///
/// Returns `Error::Data` describing the first offending delivery.
pub fn validate_purchases(purchases: &[FuelPurchase]) -> Result<()> {
    if purchases.is_empty() {
        return Err(Error::data("fuel delivery list is empty"));
    }
    for (i, p) in purchases.iter().enumerate() {
        if !(p.volume.is_finite() && p.volume >= 0.0 && p.cost.is_finite() && p.cost >= 0.0) {
            return Err(Error::data(format!(
                "delivery on {} has an invalid volume or cost",
                p.date
            )));
        }
        if i > 0 && p.date < purchases[i - 1].date {
            return Err(Error::data(format!(
                "delivery dates out of order at {}",
                p.date
            )));
        }
    }
    Ok(())
}

/// Index of the last delivery that counts towards consumption.
///
/// A trailing zero-volume record is a probe, not a delivery, so the entry
/// before it is used instead. Returns `None` when nothing is usable.
pub fn last_usable_purchase(purchases: &[FuelPurchase]) -> Option<usize> {
    let last = purchases.len().checked_sub(1)?;
    if purchases[last].volume == 0.0 {
        last.checked_sub(1)
    } else {
        Some(last)
    }
}

/// Inclusive range of sample indices covered by an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWindow {
    pub start_index: usize,
    pub end_index: usize,
}

impl AnalysisWindow {
    /// Creates a window, or `None` if `start_index > end_index`.
    pub fn new(start_index: usize, end_index: usize) -> Option<Self> {
        (start_index <= end_index).then_some(Self {
            start_index,
            end_index,
        })
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start_index <= index && index <= self.end_index
    }

    /// Number of hours in the window.
    pub fn hours(&self) -> usize {
        self.end_index - self.start_index + 1
    }
}

/// Everything the estimator and the dispatch simulator need besides data.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchSettings {
    pub season: HeatingSeason,
    /// Fuel of the existing system (used to convert deliveries to heat).
    pub baseline: FuelProfile,
    /// Fuel burned whenever demand exceeds heat-pump capacity.
    pub supplemental: FuelProfile,
    pub electricity: ElectricityConfig,
    /// Supplemental hours within this span of the hour that opened the
    /// current event belong to that event.
    #[serde(serialize_with = "serialize_hours")]
    pub event_window: Duration,
}

fn serialize_hours<S: serde::Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_i64(d.num_hours())
}

/// How the heat pump was dispatched during one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchCase {
    /// Demand above maximum capacity; the remainder is supplemental heat.
    Supplemental,
    /// Demand below minimum capacity; the unit cycles at minimum output.
    Cycling,
    /// Demand between minimum and maximum capacity.
    Modulating,
}

/// Complete record of one simulated hour.
#[derive(Debug, Clone, Serialize)]
pub struct HourStep {
    /// Sample index in the temperature record.
    pub index: usize,
    pub timestamp: NaiveDateTime,
    pub outdoor_temp_f: f64,
    /// Heat the building needs this hour (BTU).
    pub required_heat: f64,
    pub capacity_min: f64,
    pub capacity_max: f64,
    /// Effective COP at the dispatched output.
    pub cop_avg: f64,
    /// Heat the heat pump cannot deliver (BTU).
    pub supplemental_heat: f64,
    /// Electricity drawn by the heat pump (kWh).
    pub electric_kwh: f64,
    pub case: DispatchCase,
}

impl fmt::Display for HourStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | T={:>6.1}F | Q={:>8.0}  cap=[{:>7.0}, {:>7.0}]  COP={:.2} | \
             supp={:>8.0} | elec={:.3} kWh",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.outdoor_temp_f,
            self.required_heat,
            self.capacity_min,
            self.capacity_max,
            self.cop_avg,
            self.supplemental_heat,
            self.electric_kwh,
        )
    }
}

/// Per-hour results as parallel arrays over the analysis window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HourlySeries {
    pub timestamps: Vec<NaiveDateTime>,
    pub outdoor_temp_f: Vec<f64>,
    pub required_heat: Vec<f64>,
    pub capacity_max: Vec<f64>,
    pub capacity_min: Vec<f64>,
    pub cop_avg: Vec<f64>,
    pub supplemental_heat: Vec<f64>,
    pub electric_required: Vec<f64>,
}

impl HourlySeries {
    pub fn with_capacity(hours: usize) -> Self {
        Self {
            timestamps: Vec::with_capacity(hours),
            outdoor_temp_f: Vec::with_capacity(hours),
            required_heat: Vec::with_capacity(hours),
            capacity_max: Vec::with_capacity(hours),
            capacity_min: Vec::with_capacity(hours),
            cop_avg: Vec::with_capacity(hours),
            supplemental_heat: Vec::with_capacity(hours),
            electric_required: Vec::with_capacity(hours),
        }
    }

    pub fn push(&mut self, step: &HourStep) {
        self.timestamps.push(step.timestamp);
        self.outdoor_temp_f.push(step.outdoor_temp_f);
        self.required_heat.push(step.required_heat);
        self.capacity_max.push(step.capacity_max);
        self.capacity_min.push(step.capacity_min);
        self.cop_avg.push(step.cop_avg);
        self.supplemental_heat.push(step.supplemental_heat);
        self.electric_required.push(step.electric_kwh);
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Totals for one calendar year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct YearAggregate {
    /// Heat-pump electricity (kWh).
    pub kwh: f64,
    /// Supplemental fuel burned (fuel units).
    pub supplemental_units: f64,
    /// Distinct supplemental events.
    pub supplemental_events: u32,
    /// Baseline fuel actually delivered (fuel units).
    pub baseline_units: f64,
    /// Amount paid for baseline deliveries.
    pub baseline_cost: f64,
}

/// Baseline fuel delivered in one calendar year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BaselineYear {
    /// Delivered volume (fuel units).
    pub units: f64,
    /// Amount paid.
    pub cost: f64,
}

/// Counts of hours where the curve model approximated rather than
/// interpolated rated data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CurveFlags {
    /// Warmer than the warmest calibration point (held at that point).
    pub above_rated_hours: usize,
    /// At or below the coldest calibration point (plateau or cut-out).
    pub below_floor_hours: usize,
    /// Modulating hours where minimum and maximum capacity coincide.
    pub degenerate_curve_hours: usize,
}

/// Output of one dispatch simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub window: AnalysisWindow,
    pub hourly: HourlySeries,
    /// Aggregates keyed by calendar year; every year the window spans is present.
    pub years: BTreeMap<i32, YearAggregate>,
    pub flags: CurveFlags,
}

impl SimulationResult {
    /// Total heat-pump electricity over the window (kWh).
    pub fn total_kwh(&self) -> f64 {
        self.years.values().map(|y| y.kwh).sum()
    }

    /// Total supplemental fuel over the window (fuel units).
    pub fn total_supplemental_units(&self) -> f64 {
        self.years.values().map(|y| y.supplemental_units).sum()
    }

    /// Attaches the baseline deliveries bucketed by calendar year.
    ///
    /// Years outside the simulated window are added so no delivery is lost.
    pub fn with_baseline(mut self, by_year: &BTreeMap<i32, BaselineYear>) -> Self {
        for (year, baseline) in by_year {
            let agg = self.years.entry(*year).or_default();
            agg.baseline_units = baseline.units;
            agg.baseline_cost = baseline.cost;
        }
        self
    }
}
