//! Heat-pump performance as a function of outdoor temperature.
//!
//! A [`HeatPumpCurve`] holds the sparse manufacturer ratings; a
//! [`CurveModel`] turns them into capacity and COP at any temperature.
//! Two models exist:
//!
//! - [`PiecewiseCurve`] (default): linear interpolation between ratings,
//!   held flat outside the rated range.
//! - [`FittedCurve`]: legacy per-quantity line or quadratic fit, evaluated
//!   without range clamping.
//!
//! [`SelectedCurve`] erases the choice so the simulator stays monomorphic.

pub mod catalog;
pub mod fitted;
pub mod piecewise;

use serde::{Deserialize, Serialize};

pub use catalog::{Breakpoint, Catalog, HeatPumpCurve};
pub use fitted::FittedCurve;
pub use piecewise::PiecewiseCurve;

use crate::config::HeatPumpConfig;
use crate::error::Result;

/// How capacity and COP are derived from the calibration points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveMode {
    /// Linear interpolation between breakpoints.
    #[default]
    Piecewise,
    /// Line through the warmest and coldest breakpoints.
    TwoPoint,
    /// Least-squares quadratic through all breakpoints.
    Quadratic,
}

/// Behavior of the piecewise curve at and below the coldest breakpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BelowFloor {
    /// Hold the coldest breakpoint's values.
    #[default]
    Plateau,
    /// The unit shuts off: zero capacity.
    CutOut,
}

/// Where an evaluation fell relative to the rated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveRegion {
    /// Between two breakpoints (inclusive of the warmest).
    Interpolated,
    /// Warmer than the warmest breakpoint.
    AboveRated,
    /// At or below the coldest breakpoint.
    BelowFloor,
    /// Produced by a fitted polynomial.
    Fitted,
}

/// Heat-pump performance at one outdoor temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Performance {
    /// Heat output at minimum compressor speed (BTU/h).
    pub capacity_min: f64,
    /// Heat output at maximum compressor speed (BTU/h).
    pub capacity_max: f64,
    pub cop_min: f64,
    pub cop_max: f64,
    pub region: CurveRegion,
}

/// Maps outdoor temperature to heat-pump capacity and efficiency.
pub trait CurveModel {
    /// Evaluates the curve at `outdoor_temp_f` (°F).
    ///
    /// Implementations never return negative values.
    fn evaluate(&self, outdoor_temp_f: f64) -> Performance;

    /// Which mode this model implements.
    fn mode(&self) -> CurveMode;
}

/// A curve model chosen at runtime from configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectedCurve {
    Piecewise(PiecewiseCurve),
    Fitted(FittedCurve),
}

impl SelectedCurve {
    /// Builds the model configured in `[heat_pump]` for `curve`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Computation` if a fitted mode cannot be solved.
    pub fn from_config(curve: &HeatPumpCurve, config: &HeatPumpConfig) -> Result<Self> {
        Ok(match config.curve_mode {
            CurveMode::Piecewise => {
                Self::Piecewise(PiecewiseCurve::new(curve, config.below_floor))
            }
            mode @ (CurveMode::TwoPoint | CurveMode::Quadratic) => {
                Self::Fitted(FittedCurve::fit(curve, mode)?)
            }
        })
    }
}

impl CurveModel for SelectedCurve {
    fn evaluate(&self, outdoor_temp_f: f64) -> Performance {
        match self {
            Self::Piecewise(c) => c.evaluate(outdoor_temp_f),
            Self::Fitted(c) => c.evaluate(outdoor_temp_f),
        }
    }

    fn mode(&self) -> CurveMode {
        match self {
            Self::Piecewise(c) => c.mode(),
            Self::Fitted(c) => c.mode(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Three-point rating set used across the curve and dispatch tests.
    pub fn reference_curve() -> HeatPumpCurve {
        let points = vec![
            Breakpoint::new(47.0, 5000.0, 8000.0, 2.0, 3.5),
            Breakpoint::new(17.0, 4000.0, 7000.0, 1.8, 3.0),
            Breakpoint::new(5.0, 3000.0, 6000.0, 1.5, 2.5),
        ];
        match HeatPumpCurve::new("Acme", "AC-1", points) {
            Ok(curve) => curve,
            Err(e) => panic!("reference curve is valid: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::reference_curve;
    use super::*;

    #[test]
    fn default_config_selects_piecewise_plateau() {
        let model = SelectedCurve::from_config(&reference_curve(), &HeatPumpConfig::default()).unwrap();
        assert_eq!(model.mode(), CurveMode::Piecewise);
        assert!(matches!(model, SelectedCurve::Piecewise(_)));
        assert_eq!(model.evaluate(-10.0).capacity_max, 6000.0);
    }

    #[test]
    fn fitted_modes_are_selectable() {
        for mode in [CurveMode::TwoPoint, CurveMode::Quadratic] {
            let cfg = HeatPumpConfig {
                curve_mode: mode,
                ..HeatPumpConfig::default()
            };
            let model = SelectedCurve::from_config(&reference_curve(), &cfg).unwrap();
            assert_eq!(model.mode(), mode);
            assert_eq!(model.evaluate(30.0).region, CurveRegion::Fitted);
        }
    }
}
