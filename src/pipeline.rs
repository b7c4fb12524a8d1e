//! One complete analysis over an explicit input bundle.
//!
//! [`run_analysis`] chains the resistance estimate, the dispatch simulation,
//! and the annual rollup. It reads nothing but its arguments and returns a
//! fresh [`AnalysisRun`], so runs for different heat pumps can execute side
//! by side.

use std::path::Path;
use std::sync::atomic::AtomicBool;

use serde::Serialize;
use tracing::info;

use crate::config::{FuelConfig, ScenarioConfig};
use crate::curve::{Catalog, HeatPumpCurve, SelectedCurve};
use crate::error::{Error, Result};
use crate::fuel::FuelKind;
use crate::io::ingest::{load_catalog, load_deliveries, load_temperatures};
use crate::sim::engine::DispatchSimulator;
use crate::sim::resistance::{ResistanceEstimate, estimate};
use crate::sim::rollup::{AnalysisReport, EmissionFactors, Rates, ReportLabels, rollup};
use crate::sim::types::{FuelPurchase, SimulationResult};
use crate::weather::TemperatureSample;

/// Everything an analysis reads besides configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisInputs {
    pub purchases: Vec<FuelPurchase>,
    /// Hourly outdoor temperatures.
    pub samples: Vec<TemperatureSample>,
    pub catalog: Catalog,
    /// Fuel named in the delivery file header, if any.
    pub inferred_fuel: Option<FuelKind>,
}

impl AnalysisInputs {
    /// Loads all three input files.
    ///
    /// # Errors
    ///
    /// Propagates loader errors (`Io`, `Csv`, `Data`, `Config`).
    pub fn from_files(
        deliveries: &Path,
        temperatures: &Path,
        catalog: &Path,
        baseline: &FuelConfig,
    ) -> Result<Self> {
        let history = load_deliveries(deliveries, baseline)?;
        Ok(Self {
            purchases: history.purchases,
            samples: load_temperatures(temperatures)?,
            catalog: load_catalog(catalog)?,
            inferred_fuel: history.fuel,
        })
    }
}

/// Output of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRun {
    pub heat_pump: HeatPumpCurve,
    pub estimate: ResistanceEstimate,
    pub simulation: SimulationResult,
    pub report: AnalysisReport,
}

/// Runs a complete analysis of the heat pump selected in `config`.
///
/// # Errors
///
/// * `Error::Config` - invalid configuration or unknown heat pump
/// * `Error::Data` - malformed inputs
/// * `Error::Computation` - undefined resistance or emissions impact
pub fn run_analysis(inputs: &AnalysisInputs, config: &ScenarioConfig) -> Result<AnalysisRun> {
    run_analysis_with_cancel(inputs, config, &AtomicBool::new(false))
}

/// Like [`run_analysis`], but stops between hourly steps once `cancel` is set.
///
/// # Errors
///
/// As [`run_analysis`], plus `Error::Cancelled`.
pub fn run_analysis_with_cancel(
    inputs: &AnalysisInputs,
    config: &ScenarioConfig,
    cancel: &AtomicBool,
) -> Result<AnalysisRun> {
    if let Some(first) = config.validate().into_iter().next() {
        return Err(Error::Config(first));
    }

    let heat_pump = inputs.catalog.find(&config.heat_pump.model)?.clone();
    let settings = config.dispatch_settings(inputs.inferred_fuel);
    info!(
        manufacturer = heat_pump.manufacturer(),
        model = heat_pump.model(),
        baseline = %settings.baseline.kind,
        "starting heat-pump analysis"
    );

    let estimate = estimate(&inputs.purchases, &inputs.samples, &settings)?;

    let curve = SelectedCurve::from_config(&heat_pump, &config.heat_pump)?;
    let simulator = DispatchSimulator::new(settings.clone(), curve, estimate.average_resistance)?;
    let simulation = simulator
        .run_with_cancel(&inputs.samples, estimate.window, cancel)?
        .with_baseline(&estimate.baseline_by_year);

    let report = rollup(
        &simulation,
        &Rates::from_settings(&settings),
        &EmissionFactors::from_settings(&settings),
    )?
    .with_labels(ReportLabels::new(heat_pump.manufacturer(), heat_pump.model(), &settings));

    info!(
        total_savings = report.total_savings,
        co2_percent_impact = report.co2_percent_impact,
        "analysis complete"
    );

    Ok(AnalysisRun {
        heat_pump,
        estimate,
        simulation,
        report,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::curve::Breakpoint;

    /// Fifty winter days of hourly weather, three deliveries and a probe,
    /// and a two-model catalog.
    pub fn inputs() -> AnalysisInputs {
        let day = |m: u32, d: u32| NaiveDate::from_ymd_opt(2014, m, d).unwrap_or_default();
        let t0 = day(1, 1).and_hms_opt(0, 0, 0).unwrap_or_default();
        let samples = (0..50 * 24)
            .map(|h: i64| {
                let diurnal = (2.0 * std::f64::consts::PI * (h % 24) as f64 / 24.0).sin();
                let trend = ((h / 24) % 9) as f64 * 2.0;
                TemperatureSample::new(t0 + Duration::hours(h), 12.0 + trend + 10.0 * diurnal)
            })
            .collect();
        let purchases = vec![
            FuelPurchase::new(day(1, 1), 150.0, 450.0),
            FuelPurchase::new(day(1, 20), 100.0, 310.0),
            FuelPurchase::new(day(2, 10), 120.0, 348.0),
            FuelPurchase::new(day(2, 15), 0.0, 0.0),
        ];
        let curve = |name: &str, scale: f64| {
            HeatPumpCurve::new(
                "Acme",
                name,
                vec![
                    Breakpoint::new(47.0, 5000.0 * scale, 8000.0 * scale, 2.0, 3.5),
                    Breakpoint::new(17.0, 4000.0 * scale, 7000.0 * scale, 1.8, 3.0),
                    Breakpoint::new(5.0, 3000.0 * scale, 6000.0 * scale, 1.5, 2.5),
                ],
            )
        };
        let catalog = match (curve("AC-1", 1.0), curve("B-9", 3.0)) {
            (Ok(a), Ok(b)) => Catalog::new(vec![a, b]),
            _ => Catalog::default(),
        };
        AnalysisInputs {
            purchases,
            samples,
            catalog,
            inferred_fuel: Some(FuelKind::Oil),
        }
    }

    /// Reference scenario analysing `AC-1`.
    pub fn config() -> ScenarioConfig {
        let mut config = ScenarioConfig::baseline();
        config.heat_pump.model = "AC-1".into();
        config
    }
}
