//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use heatpump_sim::config::ScenarioConfig;
use heatpump_sim::curve::{Breakpoint, Catalog, HeatPumpCurve};
use heatpump_sim::fuel::FuelKind;
use heatpump_sim::pipeline::AnalysisInputs;
use heatpump_sim::sim::types::FuelPurchase;
use heatpump_sim::weather::TemperatureSample;

/// Midnight on the given 2014 day.
pub fn midnight(month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2014, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid 2014 date")
}

/// Reference ratings (47/17/5 F).
pub fn reference_curve(model: &str, scale: f64) -> HeatPumpCurve {
    HeatPumpCurve::new(
        "Acme",
        model,
        vec![
            Breakpoint::new(47.0, 5000.0 * scale, 8000.0 * scale, 2.0, 3.5),
            Breakpoint::new(17.0, 4000.0 * scale, 7000.0 * scale, 1.8, 3.0),
            Breakpoint::new(5.0, 3000.0 * scale, 6000.0 * scale, 1.5, 2.5),
        ],
    )
    .expect("reference curve is valid")
}

/// Hourly temperatures for `days` days from January 1 2014 with a daily
/// swing around `mean_f`.
pub fn winter_samples(days: i64, mean_f: f64) -> Vec<TemperatureSample> {
    let t0 = midnight(1, 1);
    (0..days * 24)
        .map(|h| {
            let swing = (2.0 * std::f64::consts::PI * (h % 24) as f64 / 24.0).sin();
            TemperatureSample::new(t0 + Duration::hours(h), mean_f + 10.0 * swing)
        })
        .collect()
}

/// Three deliveries over the first six weeks of 2014, then a probe.
pub fn oil_deliveries() -> Vec<FuelPurchase> {
    vec![
        FuelPurchase::new(midnight(1, 1).date(), 150.0, 450.0),
        FuelPurchase::new(midnight(1, 20).date(), 100.0, 310.0),
        FuelPurchase::new(midnight(2, 10).date(), 120.0, 348.0),
        FuelPurchase::new(midnight(2, 15).date(), 0.0, 0.0),
    ]
}

/// Synthetic 50-day input bundle with a small (`AC-1`) and a large (`AC-3`) unit.
pub fn default_inputs() -> AnalysisInputs {
    AnalysisInputs {
        purchases: oil_deliveries(),
        samples: winter_samples(50, 18.0),
        catalog: Catalog::new(vec![
            reference_curve("AC-1", 1.0),
            reference_curve("AC-3", 3.0),
        ]),
        inferred_fuel: Some(FuelKind::Oil),
    }
}

/// Default scenario analysing `AC-1`.
pub fn default_scenario() -> ScenarioConfig {
    let mut config = ScenarioConfig::baseline();
    config.heat_pump.model = "AC-1".into();
    config
}

/// Path of a file under the crate root.
pub fn crate_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}
