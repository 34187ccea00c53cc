use crate::error::{PKError, PKResult};
use crate::simulation::ConcentrationCurve;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Plasma caffeine thresholds (mg/L).
pub const THERAPEUTIC_THRESHOLD: f64 = 2.0;
pub const ADVERSE_THRESHOLD: f64 = 10.0;
pub const TOXIC_THRESHOLD: f64 = 20.0;
pub const SLEEP_DISRUPTION_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConcentrationBand {
    BelowTherapeutic, // < 2
    Therapeutic,      // [2, 10)
    Elevated,         // [10, 20), adverse effects possible
    Toxic,            // >= 20
}

impl ConcentrationBand {
    pub fn of(concentration: f64) -> Self {
        if concentration >= TOXIC_THRESHOLD {
            ConcentrationBand::Toxic
        } else if concentration >= ADVERSE_THRESHOLD {
            ConcentrationBand::Elevated
        } else if concentration >= THERAPEUTIC_THRESHOLD {
            ConcentrationBand::Therapeutic
        } else {
            ConcentrationBand::BelowTherapeutic
        }
    }
}

impl fmt::Display for ConcentrationBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConcentrationBand::BelowTherapeutic => "below-therapeutic",
            ConcentrationBand::Therapeutic => "therapeutic",
            ConcentrationBand::Elevated => "elevated",
            ConcentrationBand::Toxic => "toxic",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BedtimeVerdict {
    pub query: f64,         // requested offset (h)
    pub time: f64,          // nearest grid offset (h)
    pub concentration: f64, // mg/L
    pub exceeds_sleep_threshold: bool,
}

/// Hours spent in each band, attributing every grid interval to the band of
/// its left endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BandOccupancy {
    pub below_therapeutic: f64,
    pub therapeutic: f64,
    pub elevated: f64,
    pub toxic: f64,
}

impl BandOccupancy {
    fn slot(&mut self, band: ConcentrationBand) -> &mut f64 {
        match band {
            ConcentrationBand::BelowTherapeutic => &mut self.below_therapeutic,
            ConcentrationBand::Therapeutic => &mut self.therapeutic,
            ConcentrationBand::Elevated => &mut self.elevated,
            ConcentrationBand::Toxic => &mut self.toxic,
        }
    }

    pub fn hours_in(&self, band: ConcentrationBand) -> f64 {
        match band {
            ConcentrationBand::BelowTherapeutic => self.below_therapeutic,
            ConcentrationBand::Therapeutic => self.therapeutic,
            ConcentrationBand::Elevated => self.elevated,
            ConcentrationBand::Toxic => self.toxic,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdAnalyzer;

impl ThresholdAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Clinical band of every curve point, in grid order.
    pub fn classify(&self, curve: &ConcentrationCurve) -> Vec<ConcentrationBand> {
        curve.values().iter().map(|&c| ConcentrationBand::of(c)).collect()
    }

    /// Concentration at the grid point nearest to `query` (earlier point on ties).
    pub fn at_time(&self, curve: &ConcentrationCurve, query: f64) -> PKResult<BedtimeVerdict> {
        if !query.is_finite() {
            return Err(PKError::Validation(format!(
                "Query time must be a finite hour offset, got {}",
                query
            )));
        }

        let mut nearest: Option<(usize, f64)> = None;
        for (idx, &t) in curve.times().iter().enumerate() {
            let distance = (t - query).abs();
            match nearest {
                Some((_, best)) if distance >= best => {}
                _ => nearest = Some((idx, distance)),
            }
        }

        let (idx, _) = nearest.ok_or_else(|| {
            PKError::Simulation("Cannot query an empty concentration curve".to_string())
        })?;

        let time = curve.times()[idx];
        if let Some(&last) = curve.times().last() {
            if query > last {
                warn!("Query at t={:.2} h lies beyond the simulated horizon ({:.2} h)", query, last);
            }
        }

        let concentration = curve.values()[idx];
        debug!("Concentration at t={:.2} h: {:.3} mg/L", time, concentration);

        Ok(BedtimeVerdict {
            query,
            time,
            concentration,
            exceeds_sleep_threshold: concentration > SLEEP_DISRUPTION_THRESHOLD,
        })
    }

    /// Earliest grid time from which the curve stays at or below the sleep
    /// threshold through the end of the horizon.
    pub fn sleep_clear_time(&self, curve: &ConcentrationCurve) -> Option<f64> {
        let times = curve.times();
        match curve
            .values()
            .iter()
            .rposition(|&c| c > SLEEP_DISRUPTION_THRESHOLD)
        {
            None => times.first().copied(),
            Some(idx) => times.get(idx + 1).copied(),
        }
    }

    pub fn band_occupancy(&self, curve: &ConcentrationCurve) -> BandOccupancy {
        let mut occupancy = BandOccupancy::default();
        for (t, c) in curve.times().windows(2).zip(curve.values()) {
            *occupancy.slot(ConcentrationBand::of(*c)) += t[1] - t[0];
        }
        occupancy
    }

    pub fn peak_band(&self, curve: &ConcentrationCurve) -> ConcentrationBand {
        let peak = curve.values().iter().copied().fold(0.0, f64::max);
        ConcentrationBand::of(peak)
    }
}
