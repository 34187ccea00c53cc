use crate::analysis::{BandOccupancy, BedtimeVerdict, ConcentrationBand, ThresholdAnalyzer};
use crate::dosing::{DoseSchedule, ScheduleEntry};
use crate::error::PKResult;
use crate::models::PKParameters;
use crate::profile::{adjust_parameters, PhysiologicalProfile};
use crate::simulation::{simulate, ConcentrationCurve, CurveSummary, GridConfig};
use log::info;
use serde::Serialize;

/// Everything the presentation layer needs from one simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub parameters: PKParameters,
    pub half_life: f64,
    pub doses: Vec<ScheduleEntry>,
    pub total_caffeine: f64, // mg
    pub curve: ConcentrationCurve,
    pub bands: Vec<ConcentrationBand>,
    pub summary: CurveSummary,
    pub occupancy: BandOccupancy,
    pub sleep_clear_time: Option<f64>,
    pub bedtime: Option<BedtimeVerdict>,
}

/// Runs profile adjustment, simulation and threshold analysis in one call.
///
/// All inputs are validated before any curve is computed; nothing is cached
/// between calls.
pub fn run_session(
    profile: &PhysiologicalProfile,
    schedule: &DoseSchedule,
    grid: &GridConfig,
    bedtime: Option<f64>,
) -> PKResult<SessionReport> {
    grid.validate()?;
    let parameters = adjust_parameters(profile)?;
    let curve = simulate(&parameters, schedule, grid)?;

    let analyzer = ThresholdAnalyzer::new();
    let bedtime = bedtime.map(|t| analyzer.at_time(&curve, t)).transpose()?;

    let report = SessionReport {
        parameters,
        half_life: parameters.half_life(),
        doses: schedule.list().to_vec(),
        total_caffeine: schedule.total_caffeine(),
        bands: analyzer.classify(&curve),
        summary: CurveSummary::from_curve(&curve),
        occupancy: analyzer.band_occupancy(&curve),
        sleep_clear_time: analyzer.sleep_clear_time(&curve),
        curve,
        bedtime,
    };

    info!(
        "Session: Cmax={:.2} mg/L, peak band {}, {} doses",
        report.summary.cmax,
        analyzer.peak_band(&report.curve),
        report.doses.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dosing::CoffeeType;

    #[test]
    fn test_session_for_reference_adult() {
        let mut schedule = DoseSchedule::new();
        schedule.add(CoffeeType::Drip, 1, 8.0).unwrap();
        schedule.add(CoffeeType::Latte, 1, 14.0).unwrap();

        let report = run_session(
            &PhysiologicalProfile::default(),
            &schedule,
            &GridConfig::default(),
            Some(22.0),
        )
        .unwrap();

        assert_eq!(report.bands.len(), report.curve.len());
        assert_eq!(report.doses.len(), 2);
        assert_eq!(report.total_caffeine, 170.0);
        let bedtime = report.bedtime.unwrap();
        assert_eq!(bedtime.time, 22.0);
        assert!(bedtime.exceeds_sleep_threshold);
    }

    #[test]
    fn test_session_rejects_invalid_profile() {
        let profile = PhysiologicalProfile { weight: 10.0, ..Default::default() };
        let result = run_session(&profile, &DoseSchedule::new(), &GridConfig::default(), None);
        assert!(result.is_err());
    }
}
