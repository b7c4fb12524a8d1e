//! Legacy fitted curves: one polynomial in temperature per rated quantity.
//!
//! These reproduce the older analysis behavior and are never the default.
//! The polynomials are evaluated outside the rated range as well; only
//! negative results are clipped.

use crate::error::{Error, Result};
use crate::math::{polyfit, polyval};

use super::{Breakpoint, CurveMode, CurveModel, CurveRegion, HeatPumpCurve, Performance};

#[derive(Debug, Clone, PartialEq)]
pub struct FittedCurve {
    mode: CurveMode,
    capacity_min: Vec<f64>,
    capacity_max: Vec<f64>,
    cop_min: Vec<f64>,
    cop_max: Vec<f64>,
}

impl FittedCurve {
    /// Fits `curve` using a two-point line or a quadratic.
    ///
    /// # Errors
    ///
    /// Returns `Error::Computation` if the least-squares system is singular
    /// or `mode` is not a fitted mode.
    pub fn fit(curve: &HeatPumpCurve, mode: CurveMode) -> Result<Self> {
        let (points, degree): (Vec<Breakpoint>, usize) = match mode {
            CurveMode::TwoPoint => (vec![*curve.warmest(), *curve.coldest()], 1),
            CurveMode::Quadratic => (curve.breakpoints().to_vec(), 2),
            CurveMode::Piecewise => {
                return Err(Error::computation("piecewise mode is not a fitted curve"));
            }
        };

        let temps: Vec<f64> = points.iter().map(|b| b.temp_f).collect();
        let fit_one = |quantity: &str, f: fn(&Breakpoint) -> f64| -> Result<Vec<f64>> {
            let ys: Vec<f64> = points.iter().map(f).collect();
            polyfit(&temps, &ys, degree).ok_or_else(|| {
                Error::computation(format!(
                    "cannot fit {quantity} for heat pump \"{}\"",
                    curve.model()
                ))
            })
        };

        Ok(Self {
            mode,
            capacity_min: fit_one("capacity_min", |b| b.capacity_min)?,
            capacity_max: fit_one("capacity_max", |b| b.capacity_max)?,
            cop_min: fit_one("cop_min", |b| b.cop_min)?,
            cop_max: fit_one("cop_max", |b| b.cop_max)?,
        })
    }
}

impl CurveModel for FittedCurve {
    fn evaluate(&self, outdoor_temp_f: f64) -> Performance {
        let eval = |coeffs: &[f64]| polyval(coeffs, outdoor_temp_f).max(0.0);
        Performance {
            capacity_min: eval(&self.capacity_min),
            capacity_max: eval(&self.capacity_max),
            cop_min: eval(&self.cop_min),
            cop_max: eval(&self.cop_max),
            region: CurveRegion::Fitted,
        }
    }

    fn mode(&self) -> CurveMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::reference_curve;
    use super::*;

    #[test]
    fn two_point_passes_through_end_ratings() {
        let fitted = FittedCurve::fit(&reference_curve(), CurveMode::TwoPoint).unwrap();
        let warm = fitted.evaluate(47.0);
        let cold = fitted.evaluate(5.0);
        assert!((warm.capacity_max - 8000.0).abs() < 1e-6);
        assert!((cold.capacity_max - 6000.0).abs() < 1e-6);
        assert!((warm.cop_max - 3.5).abs() < 1e-9);
        assert!((cold.cop_min - 1.5).abs() < 1e-9);
    }

    #[test]
    fn quadratic_reproduces_three_ratings() {
        let rated = reference_curve();
        let fitted = FittedCurve::fit(&rated, CurveMode::Quadratic).unwrap();
        for bp in rated.breakpoints() {
            let p = fitted.evaluate(bp.temp_f);
            assert!((p.capacity_min - bp.capacity_min).abs() < 1e-6);
            assert!((p.cop_max - bp.cop_max).abs() < 1e-9);
        }
    }

    #[test]
    fn extrapolates_without_clamping_but_not_below_zero() {
        let fitted = FittedCurve::fit(&reference_curve(), CurveMode::TwoPoint).unwrap();
        // Line keeps rising past the warmest rating.
        assert!(fitted.evaluate(70.0).capacity_max > 8000.0);
        // Far below the floor the line would go negative.
        assert_eq!(fitted.evaluate(-500.0).capacity_max, 0.0);
    }

    #[test]
    fn piecewise_is_not_a_fit() {
        assert!(matches!(
            FittedCurve::fit(&reference_curve(), CurveMode::Piecewise),
            Err(Error::Computation(_))
        ));
    }
}
