use super::ConcentrationCurve;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSummary {
    pub cmax: f64,          // mg/L
    pub tmax: Option<f64>,  // h
    pub auc: f64,           // mg*h/L
}

impl CurveSummary {
    pub fn from_curve(curve: &ConcentrationCurve) -> Self {
        Self {
            cmax: max_concentration(curve),
            tmax: time_to_max(curve),
            auc: auc(curve),
        }
    }
}

pub fn max_concentration(curve: &ConcentrationCurve) -> f64 {
    curve.values().iter().copied().fold(0.0, f64::max)
}

/// Time of the first grid point reaching the peak.
pub fn time_to_max(curve: &ConcentrationCurve) -> Option<f64> {
    let mut best: Option<(f64, f64)> = None;
    for point in curve.points() {
        match best {
            Some((_, peak)) if point.concentration <= peak => {}
            _ => best = Some((point.time, point.concentration)),
        }
    }
    best.map(|(time, _)| time)
}

/// Linear trapezoidal AUC over the whole grid.
pub fn auc(curve: &ConcentrationCurve) -> f64 {
    curve
        .times()
        .windows(2)
        .zip(curve.values().windows(2))
        .map(|(t, c)| (t[1] - t[0]) * (c[0] + c[1]) / 2.0)
        .sum()
}
