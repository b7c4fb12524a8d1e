//! Annual cost and emissions comparison derived from a simulation result.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

use super::types::{CurveFlags, DispatchSettings, SimulationResult};

/// Prices used to cost the heat-pump scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rates {
    /// Price per kWh.
    pub electricity_price: f64,
    /// Price per supplemental fuel unit.
    pub supplemental_price: f64,
}

impl Rates {
    pub fn from_settings(settings: &DispatchSettings) -> Self {
        Self {
            electricity_price: settings.electricity.price_per_kwh,
            supplemental_price: settings.supplemental.price,
        }
    }
}

/// Emission factors (kg CO2eq per unit).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmissionFactors {
    pub baseline_kg_per_unit: f64,
    pub electricity_kg_per_kwh: f64,
    pub supplemental_kg_per_unit: f64,
}

impl EmissionFactors {
    pub fn from_settings(settings: &DispatchSettings) -> Self {
        Self {
            baseline_kg_per_unit: settings.baseline.kg_co2_per_unit,
            electricity_kg_per_kwh: settings.electricity.kg_co2_per_kwh,
            supplemental_kg_per_unit: settings.supplemental.kg_co2_per_unit,
        }
    }
}

/// Names printed in the report table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportLabels {
    /// `"<manufacturer> Model <model>"`.
    pub heat_pump: String,
    pub baseline_fuel: String,
    pub baseline_units: String,
    pub supplemental_fuel: String,
    pub supplemental_units: String,
}

impl ReportLabels {
    pub fn new(manufacturer: &str, model: &str, settings: &DispatchSettings) -> Self {
        Self {
            heat_pump: format!("{manufacturer} Model {model}"),
            baseline_fuel: settings.baseline.name.clone(),
            baseline_units: settings.baseline.units.clone(),
            supplemental_fuel: settings.supplemental.name.clone(),
            supplemental_units: settings.supplemental.units.clone(),
        }
    }
}

/// One row of the annual comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearReport {
    pub year: i32,
    pub baseline_units: f64,
    pub baseline_cost: f64,
    pub heat_pump_kwh: f64,
    pub heat_pump_cost: f64,
    pub supplemental_events: u32,
    pub supplemental_units: f64,
    pub supplemental_cost: f64,
    /// Baseline cost minus heat-pump and supplemental cost.
    pub savings: f64,
}

/// Annual and total comparison of the baseline system and the heat pump.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub labels: ReportLabels,
    pub years: Vec<YearReport>,
    /// Σ savings over all years; negative when the heat pump costs more.
    pub total_savings: f64,
    pub baseline_co2_kg: f64,
    pub heat_pump_co2_kg: f64,
    pub supplemental_co2_kg: f64,
    /// Emissions avoided as a percentage of baseline emissions.
    pub co2_percent_impact: f64,
    pub flags: CurveFlags,
}

impl AnalysisReport {
    /// Rolls a simulation result up into yearly and total figures.
    ///
    /// # Errors
    ///
    /// Returns `Error::Computation` if baseline emissions are zero, since
    /// the percentage impact is undefined.
    pub fn from_result(result: &SimulationResult, rates: &Rates, emissions: &EmissionFactors) -> Result<Self> {
        let mut years = Vec::with_capacity(result.years.len());
        let mut baseline_co2_kg = 0.0;
        let mut heat_pump_co2_kg = 0.0;
        let mut supplemental_co2_kg = 0.0;

        for (&year, agg) in &result.years {
            let heat_pump_cost = agg.kwh * rates.electricity_price;
            let supplemental_cost = agg.supplemental_units * rates.supplemental_price;
            years.push(YearReport {
                year,
                baseline_units: agg.baseline_units,
                baseline_cost: agg.baseline_cost,
                heat_pump_kwh: agg.kwh,
                heat_pump_cost,
                supplemental_events: agg.supplemental_events,
                supplemental_units: agg.supplemental_units,
                supplemental_cost,
                savings: agg.baseline_cost - (heat_pump_cost + supplemental_cost),
            });
            baseline_co2_kg += agg.baseline_units * emissions.baseline_kg_per_unit;
            heat_pump_co2_kg += agg.kwh * emissions.electricity_kg_per_kwh;
            supplemental_co2_kg += agg.supplemental_units * emissions.supplemental_kg_per_unit;
        }

        if baseline_co2_kg == 0.0 {
            return Err(Error::computation(
                "baseline emissions are zero; CO2 impact is undefined",
            ));
        }

        Ok(Self {
            labels: ReportLabels::default(),
            total_savings: years.iter().map(|y| y.savings).sum(),
            co2_percent_impact: 100.0 * (baseline_co2_kg - heat_pump_co2_kg - supplemental_co2_kg)
                / baseline_co2_kg,
            years,
            baseline_co2_kg,
            heat_pump_co2_kg,
            supplemental_co2_kg,
            flags: result.flags,
        })
    }

    /// Replaces the names printed in the report.
    pub fn with_labels(mut self, labels: ReportLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn first_year(&self) -> Option<i32> {
        self.years.first().map(|y| y.year)
    }

    pub fn last_year(&self) -> Option<i32> {
        self.years.last().map(|y| y.year)
    }
}

/// Rolls a simulation result up into an [`AnalysisReport`].
///
/// # Errors
///
/// See [`AnalysisReport::from_result`].
pub fn rollup(result: &SimulationResult, rates: &Rates, emissions: &EmissionFactors) -> Result<AnalysisReport> {
    AnalysisReport::from_result(result, rates, emissions)
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let l = &self.labels;
        writeln!(f, "=== Heat Pump Analysis: {} ===", l.heat_pump)?;
        writeln!(
            f,
            "{:>6} | {:>24} | {:>20} | {:>31}",
            "Year",
            format!("Baseline ({})", l.baseline_fuel),
            "Heat Pump",
            format!("Supplemental ({})", l.supplemental_fuel),
        )?;
        writeln!(
            f,
            "{:>6} | {:>12} {:>11} | {:>9} {:>10} | {:>6} {:>12} {:>11}",
            "", l.baseline_units, "Cost", "kWh", "Cost", "#days", l.supplemental_units, "Cost",
        )?;
        for y in &self.years {
            writeln!(
                f,
                "{:>6} | {:>12.1} {:>11} | {:>9.1} {:>10} | {:>6} {:>12.1} {:>11}",
                y.year,
                y.baseline_units,
                format!("${:.0}", y.baseline_cost),
                y.heat_pump_kwh,
                format!("${:.0}", y.heat_pump_cost),
                y.supplemental_events,
                y.supplemental_units,
                format!("${:.0}", y.supplemental_cost),
            )?;
        }

        let verb = if self.total_savings > 0.0 {
            "saved"
        } else {
            "cost an additional"
        };
        let direction = if self.co2_percent_impact > 0.0 {
            "less"
        } else {
            "more"
        };
        writeln!(f)?;
        match (self.first_year(), self.last_year()) {
            (Some(first), Some(last)) => write!(f, "Over the years {first}-{last}, ")?,
            _ => write!(f, "Over the analysis window, ")?,
        }
        writeln!(
            f,
            "the heat pump would have {verb} ${:.0}, emitting {:.0}% {direction} CO2eq than {}",
            self.total_savings.abs(),
            self.co2_percent_impact.abs(),
            l.baseline_fuel,
        )?;

        let flags = &self.flags;
        if flags.above_rated_hours + flags.below_floor_hours + flags.degenerate_curve_hours > 0 {
            write!(
                f,
                "Curve approximations: {} h above rating, {} h at/below floor, {} h degenerate",
                flags.above_rated_hours, flags.below_floor_hours, flags.degenerate_curve_hours,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::sim::types::{AnalysisWindow, HourlySeries, YearAggregate};

    fn result(years: &[(i32, YearAggregate)]) -> SimulationResult {
        SimulationResult {
            window: AnalysisWindow::new(0, 0).unwrap(),
            hourly: HourlySeries::default(),
            years: years.iter().copied().collect::<BTreeMap<_, _>>(),
            flags: CurveFlags::default(),
        }
    }

    fn rates() -> Rates {
        Rates {
            electricity_price: 0.15,
            supplemental_price: 3.0,
        }
    }

    fn emissions() -> EmissionFactors {
        EmissionFactors {
            baseline_kg_per_unit: 10.0,
            electricity_kg_per_kwh: 0.3,
            supplemental_kg_per_unit: 10.0,
        }
    }

    #[test]
    fn savings_and_emissions_sum_over_years() {
        let r = result(&[
            (
                2014,
                YearAggregate {
                    kwh: 1000.0,
                    supplemental_units: 10.0,
                    supplemental_events: 3,
                    baseline_units: 200.0,
                    baseline_cost: 600.0,
                },
            ),
            (
                2015,
                YearAggregate {
                    kwh: 2000.0,
                    supplemental_units: 0.0,
                    supplemental_events: 0,
                    baseline_units: 300.0,
                    baseline_cost: 900.0,
                },
            ),
        ]);
        let report = rollup(&r, &rates(), &emissions()).unwrap();
        assert_eq!(report.years.len(), 2);
        // 2014: 600 - (150 + 30) = 420; 2015: 900 - 300 = 600
        assert!((report.years[0].savings - 420.0).abs() < 1e-9);
        assert!((report.total_savings - 1020.0).abs() < 1e-9);
        // baseline 5000 kg, heat pump 900 kg, supplemental 100 kg
        assert!((report.co2_percent_impact - 80.0).abs() < 1e-9);
        assert_eq!((report.first_year(), report.last_year()), (Some(2014), Some(2015)));
    }

    #[test]
    fn zero_baseline_emissions_is_a_computation_error() {
        let r = result(&[(2014, YearAggregate { kwh: 10.0, ..Default::default() })]);
        assert!(matches!(
            rollup(&r, &rates(), &emissions()),
            Err(Error::Computation(_))
        ));
    }

    #[test]
    fn display_reports_cost_increase() {
        let r = result(&[(
            2014,
            YearAggregate {
                kwh: 10_000.0,
                baseline_units: 100.0,
                baseline_cost: 300.0,
                ..Default::default()
            },
        )]);
        let text = rollup(&r, &rates(), &emissions()).unwrap().to_string();
        assert!(text.contains("cost an additional $1200"), "got {text}");
        assert!(text.contains("Over the years 2014-2014"), "got {text}");
    }
}
