//! API response and query types.
//!
//! Hourly field names follow the hourly CSV export columns.

use serde::{Deserialize, Serialize};

use crate::curve::HeatPumpCurve;
use crate::pipeline::AnalysisRun;
use crate::sim::rollup::AnalysisReport;
use crate::sim::types::HourlySeries;

/// Annual report of one heat pump plus the building estimate it used.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub manufacturer: String,
    pub model: String,
    /// Effective thermal resistance (°F·h/BTU).
    pub average_resistance: f64,
    /// Annual comparison.
    pub report: AnalysisReport,
}

impl From<&AnalysisRun> for ReportResponse {
    fn from(run: &AnalysisRun) -> Self {
        Self {
            manufacturer: run.heat_pump.manufacturer().to_string(),
            model: run.heat_pump.model().to_string(),
            average_resistance: run.estimate.average_resistance,
            report: run.report.clone(),
        }
    }
}

/// Single simulated hour using the hourly CSV column names.
#[derive(Debug, Serialize)]
pub struct HourRecord {
    /// Position within the simulated window.
    pub hour: usize,
    /// `YYYY-MM-DD HH:MM`.
    pub timestamp: String,
    pub outdoor_temp_f: f64,
    pub required_heat: f64,
    pub capacity_min: f64,
    pub capacity_max: f64,
    pub cop_avg: f64,
    pub supplemental_heat: f64,
    pub electric_kwh: f64,
}

impl HourRecord {
    /// Record for position `hour` of `series`, if it exists.
    pub fn from_series(series: &HourlySeries, hour: usize) -> Option<Self> {
        Some(Self {
            hour,
            timestamp: series.timestamps.get(hour)?.format("%Y-%m-%d %H:%M").to_string(),
            outdoor_temp_f: *series.outdoor_temp_f.get(hour)?,
            required_heat: *series.required_heat.get(hour)?,
            capacity_min: *series.capacity_min.get(hour)?,
            capacity_max: *series.capacity_max.get(hour)?,
            cop_avg: *series.cop_avg.get(hour)?,
            supplemental_heat: *series.supplemental_heat.get(hour)?,
            electric_kwh: *series.electric_required.get(hour)?,
        })
    }
}

/// Catalog entry summary.
#[derive(Debug, Serialize)]
pub struct HeatPumpSummary {
    pub manufacturer: String,
    pub model: String,
    /// Number of rating points.
    pub breakpoints: usize,
    /// Whether this is the configured heat pump.
    pub selected: bool,
}

impl HeatPumpSummary {
    pub fn new(curve: &HeatPumpCurve, selected: bool) -> Self {
        Self {
            manufacturer: curve.manufacturer().to_string(),
            model: curve.model().to_string(),
            breakpoints: curve.breakpoints().len(),
            selected,
        }
    }
}

/// Optional range query parameters for the hourly endpoint.
#[derive(Debug, Deserialize)]
pub struct HourlyQuery {
    /// First hour (inclusive).
    pub from: Option<usize>,
    /// Last hour (inclusive).
    pub to: Option<usize>,
}

/// Heat pump to analyse on demand.
#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    pub model: String,
}

/// Error response body for 4xx/5xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::sim::types::{DispatchCase, HourStep};

    #[test]
    fn hour_record_maps_series_columns() {
        let mut series = HourlySeries::default();
        series.push(&HourStep {
            index: 40,
            timestamp: NaiveDate::from_ymd_opt(2015, 2, 3)
                .and_then(|d| d.and_hms_opt(4, 0, 0))
                .unwrap_or_default(),
            outdoor_temp_f: 12.0,
            required_heat: 5300.0,
            capacity_min: 3800.0,
            capacity_max: 6800.0,
            cop_avg: 2.2,
            supplemental_heat: 0.0,
            electric_kwh: 0.706,
            case: DispatchCase::Modulating,
        });

        let record = HourRecord::from_series(&series, 0);
        assert!(record.is_some());
        if let Some(record) = record {
            assert_eq!(record.hour, 0);
            assert_eq!(record.timestamp, "2015-02-03 04:00");
            assert_eq!(record.required_heat, 5300.0);
            assert_eq!(record.electric_kwh, 0.706); // electric_required
        }
        assert!(HourRecord::from_series(&series, 1).is_none());
    }
}
