//! Integration tests for a complete analysis run over synthetic inputs.

mod common;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use heatpump_sim::Error;
use heatpump_sim::curve::{BelowFloor, Breakpoint, CurveModel, HeatPumpCurve, PiecewiseCurve};
use heatpump_sim::pipeline::run_analysis;
use heatpump_sim::sim::types::FuelPurchase;

#[test]
fn full_run_covers_the_window() {
    let inputs = common::default_inputs();
    let run = run_analysis(&inputs, &common::default_scenario()).expect("analysis runs");
    // January 1 00:00 through the first hour of February 10.
    assert_eq!(run.estimate.window.start_index, 0);
    assert_eq!(run.estimate.window.end_index, 40 * 24);
    assert_eq!(run.simulation.hourly.len(), 40 * 24 + 1);
    assert!(run.estimate.average_resistance > 0.0);
}

#[test]
fn identical_inputs_give_identical_results() {
    let inputs = common::default_inputs();
    let a = run_analysis(&inputs, &common::default_scenario()).expect("first run");
    let b = run_analysis(&inputs, &common::default_scenario()).expect("second run");
    assert_eq!(a.simulation.hourly, b.simulation.hourly);
    assert_eq!(a.simulation.years, b.simulation.years);
    assert_eq!(a.report, b.report);
}

#[test]
fn hourly_outputs_are_non_negative() {
    let run = run_analysis(&common::default_inputs(), &common::default_scenario()).expect("analysis runs");
    let h = &run.simulation.hourly;
    assert!(h.required_heat.iter().all(|&q| q >= 0.0));
    assert!(h.electric_required.iter().all(|&e| e >= 0.0));
    assert!(h.supplemental_heat.iter().all(|&s| s >= 0.0));
}

#[test]
fn annual_kwh_matches_hourly_sum() {
    let run = run_analysis(&common::default_inputs(), &common::default_scenario()).expect("analysis runs");
    let hourly: f64 = run.simulation.hourly.electric_required.iter().sum();
    assert!((hourly - run.simulation.total_kwh()).abs() < 1e-6);
    let reported: f64 = run.report.years.iter().map(|y| y.heat_pump_kwh).sum();
    assert!((reported - hourly).abs() < 1e-6);
}

#[test]
fn runs_for_different_heat_pumps_are_independent() {
    let inputs = common::default_inputs();
    let small = run_analysis(&inputs, &common::default_scenario()).expect("AC-1 runs");
    let mut config = common::default_scenario();
    config.heat_pump.model = "AC-3".into();
    let large = run_analysis(&inputs, &config).expect("AC-3 runs");
    let small_again = run_analysis(&inputs, &common::default_scenario()).expect("AC-1 reruns");

    assert_eq!(small, small_again);
    assert_eq!(small.estimate, large.estimate);
    assert!(large.simulation.total_supplemental_units() < small.simulation.total_supplemental_units());
}

#[test]
fn all_zero_volume_is_a_computation_error() {
    let mut inputs = common::default_inputs();
    inputs.purchases = inputs
        .purchases
        .iter()
        .map(|p| FuelPurchase::new(p.date, 0.0, 0.0))
        .collect();
    let err = run_analysis(&inputs, &common::default_scenario());
    assert!(matches!(err, Err(Error::Computation(_))), "got {err:?}");
}

#[test]
fn uncovered_first_delivery_is_a_data_error() {
    let mut inputs = common::default_inputs();
    inputs.samples.drain(..24);
    let err = run_analysis(&inputs, &common::default_scenario());
    assert!(matches!(err, Err(Error::Data(_))), "got {err:?}");
}

#[test]
fn random_curves_stay_within_rated_extremes() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let mut temp = rng.random_range(40.0..60.0);
        let mut points = Vec::new();
        for _ in 0..rng.random_range(3..6) {
            let cap_min = rng.random_range(1000.0..8000.0);
            let cop_min = rng.random_range(1.0..3.0);
            points.push(Breakpoint::new(
                temp,
                cap_min,
                cap_min + rng.random_range(0.0..8000.0),
                cop_min,
                cop_min + rng.random_range(0.0..2.0),
            ));
            temp -= rng.random_range(5.0..20.0);
        }
        let curve = HeatPumpCurve::new("Rand", "R", points.clone()).expect("random curve is valid");
        let model = PiecewiseCurve::new(&curve, BelowFloor::Plateau);

        let max = |f: fn(&Breakpoint) -> f64| points.iter().map(f).fold(f64::NEG_INFINITY, f64::max);
        let min = |f: fn(&Breakpoint) -> f64| points.iter().map(f).fold(f64::INFINITY, f64::min);
        for _ in 0..50 {
            let t = rng.random_range(-60.0..90.0);
            let p = model.evaluate(t);
            assert!(p.capacity_max <= max(|b| b.capacity_max) + 1e-9);
            assert!(p.capacity_max >= min(|b| b.capacity_max) - 1e-9);
            assert!(p.capacity_min <= max(|b| b.capacity_min) + 1e-9);
            assert!(p.capacity_min >= min(|b| b.capacity_min) - 1e-9);
            assert!(p.cop_max <= max(|b| b.cop_max) + 1e-9);
            assert!(p.cop_min >= min(|b| b.cop_min) - 1e-9);
        }
    }
}

#[test]
fn random_weather_never_yields_negative_outputs() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..5 {
        let mut inputs = common::default_inputs();
        for s in &mut inputs.samples {
            s.outdoor_temp_f = rng.random_range(-20.0..70.0);
        }
        let run = run_analysis(&inputs, &common::default_scenario()).expect("analysis runs");
        let h = &run.simulation.hourly;
        assert!(h.required_heat.iter().all(|&q| q >= 0.0));
        assert!(h.electric_required.iter().all(|&e| e >= 0.0 && e.is_finite()));
    }
}
