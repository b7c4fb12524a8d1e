//! Hourly dispatch simulation of a heat pump with supplemental backup.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{Datelike, NaiveDateTime};
use tracing::{info, warn};

use crate::curve::{CurveModel, CurveRegion};
use crate::error::{Error, Result};
use crate::weather::TemperatureSample;

use super::clock::Clock;
use super::types::{
    AnalysisWindow, CurveFlags, DispatchCase, DispatchSettings, HourStep, HourlySeries,
    SimulationResult, YearAggregate,
};

/// State threaded from one simulated hour to the next.
///
/// Accumulates locally and is only turned into a [`SimulationResult`] once
/// the whole window has been simulated.
#[derive(Debug, Clone, Default)]
pub struct DispatchState {
    /// Hour that opened the current supplemental event.
    pub last_event: Option<NaiveDateTime>,
    pub years: BTreeMap<i32, YearAggregate>,
    pub flags: CurveFlags,
    pub hourly: HourlySeries,
}

impl DispatchState {
    /// Creates a state with an empty aggregate for every year of `window`.
    pub fn for_window(samples: &[TemperatureSample], window: &AnalysisWindow) -> Self {
        let first = samples[window.start_index].timestamp.year();
        let last = samples[window.end_index].timestamp.year();
        Self {
            last_event: None,
            years: (first..=last).map(|y| (y, YearAggregate::default())).collect(),
            flags: CurveFlags::default(),
            hourly: HourlySeries::with_capacity(window.hours()),
        }
    }
}

/// Simulates hour-by-hour heating dispatch for one heat pump.
///
/// Generic over `M: CurveModel` for static dispatch.
pub struct DispatchSimulator<M: CurveModel> {
    settings: DispatchSettings,
    curve: M,
    resistance: f64,
}

impl<M: CurveModel> DispatchSimulator<M> {
    /// Creates a simulator.
    ///
    /// # Arguments
    ///
    /// * `settings` - Heating season, fuels, and electricity constants
    /// * `curve` - Capacity/COP model of the selected heat pump
    /// * `resistance` - Effective thermal resistance of the building (°F·h/BTU)
    ///
    /// # Errors
    ///
    /// Returns `Error::Computation` if `resistance` is not a positive number.
    pub fn new(settings: DispatchSettings, curve: M, resistance: f64) -> Result<Self> {
        if !(resistance.is_finite() && resistance > 0.0) {
            return Err(Error::computation(format!(
                "thermal resistance must be positive, got {resistance}"
            )));
        }
        Ok(Self {
            settings,
            curve,
            resistance,
        })
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    pub fn curve(&self) -> &M {
        &self.curve
    }

    /// Simulates hour `index` and folds it into `state`.
    ///
    /// # Returns
    ///
    /// The complete record of the hour.
    pub fn step(
        &self,
        samples: &[TemperatureSample],
        window: &AnalysisWindow,
        index: usize,
        state: &mut DispatchState,
    ) -> HourStep {
        let sample = &samples[index];
        let season = &self.settings.season;
        let btu_per_kwh = self.settings.electricity.energy_content_btu;

        // 1. Heat demand
        let required_heat = if season.is_heating(samples, index, window) {
            season.delta_t(sample) / self.resistance
        } else {
            0.0
        };

        // 2. Heat-pump performance at this temperature
        let perf = self.curve.evaluate(sample.outdoor_temp_f);
        if required_heat > 0.0 {
            match perf.region {
                CurveRegion::AboveRated => state.flags.above_rated_hours += 1,
                CurveRegion::BelowFloor => state.flags.below_floor_hours += 1,
                CurveRegion::Interpolated | CurveRegion::Fitted => {}
            }
        }

        // 3. Dispatch
        let year = sample.timestamp.year();
        let agg = state.years.entry(year).or_default();
        let (case, cop_avg, supplemental_heat, electric_kwh) = if required_heat > perf.capacity_max {
            let supplemental_heat = required_heat - perf.capacity_max;
            let supp = &self.settings.supplemental;
            agg.supplemental_units += supplemental_heat / (supp.hvac_efficiency * supp.energy_content);

            let new_event = state
                .last_event
                .is_none_or(|t| sample.timestamp - t > self.settings.event_window);
            if new_event {
                agg.supplemental_events += 1;
                state.last_event = Some(sample.timestamp);
            }

            (
                DispatchCase::Supplemental,
                perf.cop_max,
                supplemental_heat,
                to_kwh(perf.capacity_max, perf.cop_max, btu_per_kwh),
            )
        } else if required_heat < perf.capacity_min {
            (
                DispatchCase::Cycling,
                perf.cop_min,
                0.0,
                to_kwh(required_heat, perf.cop_min, btu_per_kwh),
            )
        } else {
            let span = perf.capacity_max - perf.capacity_min;
            let cop_avg = if span > 0.0 {
                perf.cop_min + (required_heat - perf.capacity_min) * (perf.cop_max - perf.cop_min) / span
            } else {
                if required_heat > 0.0 {
                    state.flags.degenerate_curve_hours += 1;
                }
                perf.cop_min
            };
            (
                DispatchCase::Modulating,
                cop_avg,
                0.0,
                to_kwh(required_heat, cop_avg, btu_per_kwh),
            )
        };
        agg.kwh += electric_kwh;

        let step = HourStep {
            index,
            timestamp: sample.timestamp,
            outdoor_temp_f: sample.outdoor_temp_f,
            required_heat,
            capacity_min: perf.capacity_min,
            capacity_max: perf.capacity_max,
            cop_avg,
            supplemental_heat,
            electric_kwh,
            case,
        };
        state.hourly.push(&step);
        step
    }

    /// Simulates every hour of `window`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Data` if the window does not fit `samples`.
    pub fn run(&self, samples: &[TemperatureSample], window: AnalysisWindow) -> Result<SimulationResult> {
        self.run_with_cancel(samples, window, &AtomicBool::new(false))
    }

    /// Simulates every hour of `window`, checking `cancel` before each hour.
    ///
    /// Nothing is returned for a cancelled run.
    ///
    /// # Errors
    ///
    /// * `Error::Cancelled` - `cancel` was set during the run
    /// * `Error::Data` - the window does not fit `samples`
    pub fn run_with_cancel(
        &self,
        samples: &[TemperatureSample],
        window: AnalysisWindow,
        cancel: &AtomicBool,
    ) -> Result<SimulationResult> {
        if window.end_index >= samples.len() {
            return Err(Error::data(format!(
                "analysis window ends at hour {} but only {} samples exist",
                window.end_index,
                samples.len()
            )));
        }

        info!(
            hours = window.hours(),
            resistance = self.resistance,
            mode = ?self.curve.mode(),
            "starting dispatch simulation"
        );

        let mut state = DispatchState::for_window(samples, &window);
        let mut clock = Clock::over(window);
        while let Some(index) = clock.tick() {
            if cancel.load(Ordering::Relaxed) {
                info!(remaining = clock.remaining() + 1, "dispatch simulation cancelled");
                return Err(Error::Cancelled);
            }
            self.step(samples, &window, index, &mut state);
        }

        let flags = state.flags;
        if flags.above_rated_hours > 0 {
            warn!(
                hours = flags.above_rated_hours,
                "outdoor temperature above warmest rating; rated values held"
            );
        }
        if flags.below_floor_hours > 0 {
            warn!(
                hours = flags.below_floor_hours,
                "outdoor temperature at or below coldest rating; floor behavior applied"
            );
        }
        if flags.degenerate_curve_hours > 0 {
            warn!(
                hours = flags.degenerate_curve_hours,
                "minimum and maximum capacity coincide; minimum COP used"
            );
        }

        let result = SimulationResult {
            window,
            hourly: state.hourly,
            years: state.years,
            flags,
        };
        info!(
            kwh = result.total_kwh(),
            supplemental_units = result.total_supplemental_units(),
            "dispatch simulation finished"
        );
        Ok(result)
    }
}

/// Electricity (kWh) to deliver `heat` BTU at `cop`; zero when `cop` is zero.
fn to_kwh(heat: f64, cop: f64, btu_per_kwh: f64) -> f64 {
    if cop > 0.0 && btu_per_kwh > 0.0 {
        heat / cop / btu_per_kwh
    } else {
        0.0
    }
}
