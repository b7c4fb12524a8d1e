use crate::math::lerp;

use super::{BelowFloor, Breakpoint, CurveMode, CurveModel, CurveRegion, HeatPumpCurve, Performance};

/// Piecewise-linear interpolation between calibration breakpoints.
///
/// Warmer than the warmest rating the warmest values are held; at or below
/// the coldest rating the coldest values are held ([`BelowFloor::Plateau`])
/// or capacity drops to zero ([`BelowFloor::CutOut`]).
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseCurve {
    breakpoints: Vec<Breakpoint>,
    below_floor: BelowFloor,
}

impl PiecewiseCurve {
    pub fn new(curve: &HeatPumpCurve, below_floor: BelowFloor) -> Self {
        Self {
            breakpoints: curve.breakpoints().to_vec(),
            below_floor,
        }
    }

    fn at(bp: &Breakpoint, region: CurveRegion) -> Performance {
        Performance {
            capacity_min: bp.capacity_min,
            capacity_max: bp.capacity_max,
            cop_min: bp.cop_min,
            cop_max: bp.cop_max,
            region,
        }
    }
}

impl CurveModel for PiecewiseCurve {
    fn evaluate(&self, outdoor_temp_f: f64) -> Performance {
        // HeatPumpCurve guarantees at least three points, warmest first.
        let warmest = &self.breakpoints[0];
        let coldest = &self.breakpoints[self.breakpoints.len() - 1];

        if outdoor_temp_f > warmest.temp_f {
            return Self::at(warmest, CurveRegion::AboveRated);
        }
        if outdoor_temp_f <= coldest.temp_f {
            let mut perf = Self::at(coldest, CurveRegion::BelowFloor);
            if self.below_floor == BelowFloor::CutOut {
                perf.capacity_min = 0.0;
                perf.capacity_max = 0.0;
            }
            return perf;
        }

        let (hi, lo) = self
            .breakpoints
            .windows(2)
            .map(|w| (&w[0], &w[1]))
            .find(|(hi, lo)| outdoor_temp_f <= hi.temp_f && outdoor_temp_f > lo.temp_f)
            .unwrap_or((warmest, coldest));

        let t = outdoor_temp_f;
        Performance {
            capacity_min: lerp(t, hi.temp_f, lo.temp_f, hi.capacity_min, lo.capacity_min),
            capacity_max: lerp(t, hi.temp_f, lo.temp_f, hi.capacity_max, lo.capacity_max),
            cop_min: lerp(t, hi.temp_f, lo.temp_f, hi.cop_min, lo.cop_min),
            cop_max: lerp(t, hi.temp_f, lo.temp_f, hi.cop_max, lo.cop_max),
            region: CurveRegion::Interpolated,
        }
    }

    fn mode(&self) -> CurveMode {
        CurveMode::Piecewise
    }
}
