use crate::analysis::{
    BandOccupancy, BedtimeVerdict, ConcentrationBand, ADVERSE_THRESHOLD,
    SLEEP_DISRUPTION_THRESHOLD, THERAPEUTIC_THRESHOLD, TOXIC_THRESHOLD,
};
use crate::clock;
use crate::error::PKResult;
use crate::models::PKParameters;
use crate::session::SessionReport;
use crate::simulation::CurveSummary;
use chrono::NaiveTime;
use log::info;
use serde::Serialize;
use std::fs::File;
use std::path::Path;

pub fn save_results<P: AsRef<Path>>(report: &SessionReport, origin: NaiveTime, output_dir: P) -> PKResult<()> {
    let output_path = output_dir.as_ref();

    save_concentration_data(report, origin, &output_path.join("concentrations.csv"))?;
    save_summary(report, origin, &output_path.join("summary.json"))?;
    generate_report(report, origin, output_path)?;

    info!("All results saved to {:?}", output_path);
    Ok(())
}

fn save_concentration_data<P: AsRef<Path>>(report: &SessionReport, origin: NaiveTime, path: P) -> PKResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(["TIME_H", "CLOCK", "CONCENTRATION", "BAND"])?;

    for (point, band) in report.curve.points().zip(&report.bands) {
        writer.write_record(&[
            format!("{:.4}", point.time),
            clock::label(origin, point.time),
            format!("{:.6}", point.concentration),
            band.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct SummaryFile<'a> {
    start: String,
    parameters: &'a PKParameters,
    half_life: f64,
    total_caffeine: f64,
    summary: &'a CurveSummary,
    occupancy: &'a BandOccupancy,
    sleep_clear_time: Option<f64>,
    bedtime: Option<&'a BedtimeVerdict>,
}

fn save_summary<P: AsRef<Path>>(report: &SessionReport, origin: NaiveTime, path: P) -> PKResult<()> {
    let summary = SummaryFile {
        start: clock::label(origin, 0.0),
        parameters: &report.parameters,
        half_life: report.half_life,
        total_caffeine: report.total_caffeine,
        summary: &report.summary,
        occupancy: &report.occupancy,
        sleep_clear_time: report.sleep_clear_time,
        bedtime: report.bedtime.as_ref(),
    };
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &summary)?;
    Ok(())
}

/// Renders a Markdown report of the session.
pub fn render_report(report: &SessionReport, origin: NaiveTime) -> String {
    let doses = if report.doses.is_empty() {
        "- (none)\n".to_string()
    } else {
        report
            .doses
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                format!(
                    "{}. {} x{} - {:.0} mg at {}\n",
                    i + 1,
                    entry.coffee,
                    entry.servings,
                    entry.event.amount,
                    clock::label(origin, entry.event.timestamp)
                )
            })
            .collect()
    };

    let tmax = report
        .summary
        .tmax
        .map(|t| clock::label(origin, t))
        .unwrap_or_else(|| "-".to_string());

    let sleep_clear = report
        .sleep_clear_time
        .map(|t| clock::label(origin, t))
        .unwrap_or_else(|| "not within the simulated window".to_string());

    let bedtime = match &report.bedtime {
        Some(verdict) => format!(
            "- Concentration at {}: {:.2} mg/L\n- {}\n",
            clock::label(origin, verdict.time),
            verdict.concentration,
            if verdict.exceeds_sleep_threshold {
                "High caffeine level may disturb your sleep."
            } else {
                "Caffeine level is low enough for good sleep."
            }
        ),
        None => "- No bedtime given\n".to_string(),
    };

    let occ = &report.occupancy;

    format!(
        r#"# Caffeine Simulation Report

## Individual Parameters
- **Volume of distribution (Vd)**: {:.2} L
- **Clearance (CL)**: {:.2} L/h
- **Elimination rate (Ke)**: {:.4} 1/h
- **Absorption rate (Ka)**: {:.2} 1/h
- **Half-life**: {:.2} h

## Doses
{}
## Concentration Profile
- **Cmax**: {:.2} mg/L at {}
- **AUC**: {:.2} mg*h/L
- **Hours {}** (< {} mg/L): {:.2}
- **Hours {}** ({}-{} mg/L): {:.2}
- **Hours {}** ({}-{} mg/L): {:.2}
- **Hours {}** (>= {} mg/L): {:.2}

## Sleep
- Below {} mg/L for the rest of the window from: {}
{}"#,
        report.parameters.vd,
        report.parameters.cl,
        report.parameters.ke,
        report.parameters.ka,
        report.half_life,
        doses,
        report.summary.cmax,
        tmax,
        report.summary.auc,
        ConcentrationBand::BelowTherapeutic,
        THERAPEUTIC_THRESHOLD,
        occ.below_therapeutic,
        ConcentrationBand::Therapeutic,
        THERAPEUTIC_THRESHOLD,
        ADVERSE_THRESHOLD,
        occ.therapeutic,
        ConcentrationBand::Elevated,
        ADVERSE_THRESHOLD,
        TOXIC_THRESHOLD,
        occ.elevated,
        ConcentrationBand::Toxic,
        TOXIC_THRESHOLD,
        occ.toxic,
        SLEEP_DISRUPTION_THRESHOLD,
        sleep_clear,
        bedtime,
    )
}

pub fn generate_report<P: AsRef<Path>>(report: &SessionReport, origin: NaiveTime, output_dir: P) -> PKResult<()> {
    let report_path = output_dir.as_ref().join("simulation_report.md");
    std::fs::write(report_path, render_report(report, origin))?;
    Ok(())
}
