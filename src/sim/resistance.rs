//! Effective thermal resistance of a building from its fuel history.
//!
//! Over the analysis window, the heat delivered by the baseline system
//! (`efficiency × energy content × volume`) has to match the heat lost
//! through an envelope of resistance `R`: `Σ ΔT / R`. Solving for `R` gives
//! the average resistance in °F·h/BTU used by the dispatch simulator.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::weather::{TemperatureSample, validate_samples};

use super::types::{
    AnalysisWindow, BaselineYear, DispatchSettings, FuelPurchase, last_usable_purchase,
    validate_purchases,
};

/// Resistance attributed to one interval between consecutive deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodResistance {
    /// Date of the delivery that opened the period.
    pub start: NaiveDate,
    /// Date of the delivery that closed it (and whose volume was burned).
    pub end: NaiveDate,
    /// Heating degree-hours inside the period (°F·h).
    pub degree_hours: f64,
    /// Volume of the closing delivery (fuel units).
    pub volume: f64,
    /// `None` when the closing delivery has zero volume.
    pub resistance: Option<f64>,
}

/// Output of [`estimate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResistanceEstimate {
    pub window: AnalysisWindow,
    /// Effective thermal resistance (°F·h/BTU).
    pub average_resistance: f64,
    /// Heating degree-hours over the window (°F·h).
    pub degree_hours: f64,
    /// Baseline fuel consumed over the window (fuel units).
    pub total_volume: f64,
    /// Deliveries bucketed by calendar year.
    pub baseline_by_year: BTreeMap<i32, BaselineYear>,
    /// Diagnostic per-period resistances.
    pub periods: Vec<PeriodResistance>,
}

/// Locates the analysis window for a delivery history.
///
/// The window opens at the first sample dated on the first delivery and
/// closes at the first later sample dated on the last usable delivery, or at
/// the final sample when no such sample exists.
///
/// # Errors
///
/// Returns `Error::Data` if no sample falls on the first delivery date, and
/// `Error::Computation` if no delivery is usable.
pub fn find_window(purchases: &[FuelPurchase], samples: &[TemperatureSample]) -> Result<AnalysisWindow> {
    let first = purchases
        .first()
        .ok_or_else(|| Error::data("fuel delivery list is empty"))?;
    let last = last_usable_purchase(purchases)
        .ok_or_else(|| Error::computation("no usable fuel delivery"))?;
    let last_date = purchases[last].date;

    let start = samples
        .iter()
        .position(|s| s.timestamp.date() == first.date)
        .ok_or_else(|| {
            Error::data(format!(
                "temperature record does not cover the first delivery date {}",
                first.date
            ))
        })?;
    let end = samples[start + 1..]
        .iter()
        .position(|s| s.timestamp.date() == last_date)
        .map(|offset| start + 1 + offset)
        .unwrap_or(samples.len() - 1);

    AnalysisWindow::new(start, end)
        .ok_or_else(|| Error::data("analysis window ends before it starts"))
}

/// Estimates the building's average thermal resistance.
///
/// # Arguments
///
/// * `purchases` - Fuel deliveries, ascending by date
/// * `samples` - Hourly outdoor temperatures, ascending
/// * `settings` - Heating season and baseline fuel
///
/// # Errors
///
/// * `Error::Data` - malformed records or the first delivery is not covered
/// * `Error::Computation` - zero total volume or zero degree-hours
/// * `Error::Config` - the heating season never overlaps the window
pub fn estimate(
    purchases: &[FuelPurchase],
    samples: &[TemperatureSample],
    settings: &DispatchSettings,
) -> Result<ResistanceEstimate> {
    validate_purchases(purchases)?;
    validate_samples(samples)?;

    let window = find_window(purchases, samples)?;
    let last = last_usable_purchase(purchases)
        .ok_or_else(|| Error::computation("no usable fuel delivery"))?;
    let end_date = samples[window.end_index].timestamp.date();
    let cutoff = purchases[last].date.min(end_date);

    let mut total_volume = 0.0;
    let mut baseline_by_year: BTreeMap<i32, BaselineYear> = BTreeMap::new();
    for p in purchases[..=last].iter().filter(|p| p.date <= cutoff) {
        total_volume += p.volume;
        let year = baseline_by_year.entry(p.date.year()).or_default();
        year.units += p.volume;
        year.cost += p.cost;
    }
    if total_volume <= 0.0 {
        return Err(Error::computation("total fuel volume over the analysis window is zero"));
    }

    let season = &settings.season;
    let in_season = (window.start_index..=window.end_index)
        .any(|i| season.in_season(samples[i].timestamp.date()));
    if !in_season {
        return Err(Error::config(
            "building.turn_on",
            format!(
                "heating season {}..{} never overlaps the analysis window",
                season.turn_on, season.turn_off
            ),
        ));
    }

    let degree_hours: f64 = (window.start_index..=window.end_index)
        .filter(|&i| season.is_heating(samples, i, &window))
        .map(|i| season.delta_t(&samples[i]))
        .sum();
    if degree_hours <= 0.0 {
        return Err(Error::computation(
            "no heating degree-hours in the analysis window",
        ));
    }

    let baseline = &settings.baseline;
    let heat_per_unit = baseline.hvac_efficiency * baseline.energy_content;
    let average_resistance = degree_hours / (heat_per_unit * total_volume);

    let periods = period_resistances(purchases, last, samples, &window, settings);
    for period in &periods {
        debug!(
            start = %period.start,
            end = %period.end,
            degree_hours = period.degree_hours,
            resistance = ?period.resistance,
            "delivery period"
        );
    }

    info!(
        hours = window.hours(),
        degree_hours,
        total_volume,
        average_resistance,
        "estimated thermal resistance"
    );

    Ok(ResistanceEstimate {
        window,
        average_resistance,
        degree_hours,
        total_volume,
        baseline_by_year,
        periods,
    })
}

/// Attributes heating degree-hours between consecutive deliveries to the
/// later delivery's volume.
fn period_resistances(
    purchases: &[FuelPurchase],
    last: usize,
    samples: &[TemperatureSample],
    window: &AnalysisWindow,
    settings: &DispatchSettings,
) -> Vec<PeriodResistance> {
    let mut degree_hours = vec![0.0; last];
    let mut p = 0;
    for i in window.start_index..=window.end_index {
        if p >= last {
            break;
        }
        if !settings.season.is_heating(samples, i, window) {
            continue;
        }
        let date = samples[i].timestamp.date();
        while p < last && date > purchases[p + 1].date {
            p += 1;
        }
        if p < last {
            degree_hours[p] += settings.season.delta_t(&samples[i]);
        }
    }

    let heat_per_unit = settings.baseline.hvac_efficiency * settings.baseline.energy_content;
    degree_hours
        .into_iter()
        .enumerate()
        .map(|(p, dh)| {
            let volume = purchases[p + 1].volume;
            PeriodResistance {
                start: purchases[p].date,
                end: purchases[p + 1].date,
                degree_hours: dh,
                volume,
                resistance: (volume > 0.0).then(|| dh / (heat_per_unit * volume)),
            }
        })
        .collect()
}
