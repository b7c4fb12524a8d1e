//! Heat-pump calibration data and the catalog it is selected from.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// One manufacturer rating point.
///
/// Capacities are heat output rates (BTU/h) at minimum and maximum
/// compressor speed; COPs are the matching coefficients of performance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    /// Outdoor temperature of the rating (°F).
    pub temp_f: f64,
    pub capacity_min: f64,
    pub capacity_max: f64,
    pub cop_min: f64,
    pub cop_max: f64,
}

impl Breakpoint {
    pub fn new(temp_f: f64, capacity_min: f64, capacity_max: f64, cop_min: f64, cop_max: f64) -> Self {
        Self {
            temp_f,
            capacity_min,
            capacity_max,
            cop_min,
            cop_max,
        }
    }
}

/// Calibration curve of one heat pump.
///
/// Breakpoints are ordered warmest first (typically 47, 17, and 5 °F plus
/// an optional colder rating).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatPumpCurve {
    manufacturer: String,
    model: String,
    breakpoints: Vec<Breakpoint>,
}

impl HeatPumpCurve {
    /// Minimum number of rating points a curve needs.
    pub const MIN_BREAKPOINTS: usize = 3;

    /// Builds a curve after checking its calibration points.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if there are fewer than three breakpoints,
    /// temperatures are not strictly decreasing, or a value is negative or
    /// not finite.
    pub fn new(
        manufacturer: impl Into<String>,
        model: impl Into<String>,
        breakpoints: Vec<Breakpoint>,
    ) -> Result<Self, ConfigError> {
        let model = model.into();
        let field = format!("heat_pump[{model}].breakpoints");

        if breakpoints.len() < Self::MIN_BREAKPOINTS {
            return Err(ConfigError {
                field,
                message: format!(
                    "need at least {} breakpoints, got {}",
                    Self::MIN_BREAKPOINTS,
                    breakpoints.len()
                ),
            });
        }
        for (i, bp) in breakpoints.iter().enumerate() {
            let values = [bp.capacity_min, bp.capacity_max, bp.cop_min, bp.cop_max];
            if !bp.temp_f.is_finite() || values.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(ConfigError {
                    field,
                    message: format!("breakpoint {i} has a negative or non-finite value"),
                });
            }
            if i > 0 && bp.temp_f >= breakpoints[i - 1].temp_f {
                return Err(ConfigError {
                    field,
                    message: format!(
                        "temperatures must strictly decrease ({} F follows {} F)",
                        bp.temp_f,
                        breakpoints[i - 1].temp_f
                    ),
                });
            }
        }

        Ok(Self {
            manufacturer: manufacturer.into(),
            model,
            breakpoints,
        })
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Rating points, warmest first. Never fewer than three.
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// The warmest rating point.
    pub fn warmest(&self) -> &Breakpoint {
        &self.breakpoints[0]
    }

    /// The coldest rating point.
    pub fn coldest(&self) -> &Breakpoint {
        &self.breakpoints[self.breakpoints.len() - 1]
    }
}

/// The set of heat pumps an analysis can choose from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    curves: Vec<HeatPumpCurve>,
}

impl Catalog {
    pub fn new(curves: Vec<HeatPumpCurve>) -> Self {
        Self { curves }
    }

    pub fn curves(&self) -> &[HeatPumpCurve] {
        &self.curves
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Looks up a heat pump by model name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if no curve has that model name.
    pub fn find(&self, model: &str) -> Result<&HeatPumpCurve, ConfigError> {
        let wanted = model.trim();
        self.curves
            .iter()
            .find(|c| c.model.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError {
                field: "heat_pump.model".into(),
                message: format!(
                    "unknown heat pump \"{wanted}\" ({} models in catalog)",
                    self.curves.len()
                ),
            })
    }
}
