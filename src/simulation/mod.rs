pub mod summary;

use crate::dosing::DoseSchedule;
use crate::error::{PKError, PKResult};
use crate::models::{OneCompartmentModel, PKModel, PKParameters};
use log::{debug, info};
use serde::{Deserialize, Serialize};

pub use summary::*;

pub const MIN_HORIZON_HOURS: f64 = 1.0;
pub const MAX_HORIZON_HOURS: f64 = 23.0;
pub const MIN_STEP_MINUTES: u32 = 1;
pub const MAX_STEP_MINUTES: u32 = 60;

/// Slack on the interval count so a horizon landing on a grid point is not
/// pushed one step further by rounding in `horizon * 60 / step`.
const GRID_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_horizon")]
    pub horizon_hours: f64,
    #[serde(default = "default_step")]
    pub step_minutes: u32,
}

fn default_horizon() -> f64 {
    23.0
}

fn default_step() -> u32 {
    15
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            horizon_hours: default_horizon(),
            step_minutes: default_step(),
        }
    }
}

impl GridConfig {
    pub fn new(horizon_hours: f64, step_minutes: u32) -> PKResult<Self> {
        let config = Self { horizon_hours, step_minutes };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PKResult<()> {
        if !self.horizon_hours.is_finite()
            || self.horizon_hours < MIN_HORIZON_HOURS
            || self.horizon_hours > MAX_HORIZON_HOURS
        {
            return Err(PKError::Validation(format!(
                "Simulation horizon must be within [{}, {}] hours, got {}",
                MIN_HORIZON_HOURS, MAX_HORIZON_HOURS, self.horizon_hours
            )));
        }
        if !(MIN_STEP_MINUTES..=MAX_STEP_MINUTES).contains(&self.step_minutes) {
            return Err(PKError::Validation(format!(
                "Time step must be within [{}, {}] minutes, got {}",
                MIN_STEP_MINUTES, MAX_STEP_MINUTES, self.step_minutes
            )));
        }
        Ok(())
    }
}

/// Evenly spaced hour offsets starting at 0 whose last point is the first
/// multiple of the step at or beyond the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    points: Vec<f64>,
}

impl TimeGrid {
    pub fn build(config: &GridConfig) -> PKResult<Self> {
        config.validate()?;

        let step = config.step_minutes as f64;
        let intervals = (config.horizon_hours * 60.0 / step - GRID_TOLERANCE).ceil() as usize;
        // i * step / 60 rather than accumulated sums keeps points exact
        let points = (0..=intervals).map(|i| i as f64 * step / 60.0).collect();

        Ok(Self { points })
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub time: f64,          // hours from simulation start
    pub concentration: f64, // mg/L
}

/// Concentrations aligned one-to-one with a `TimeGrid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationCurve {
    grid: TimeGrid,
    values: Vec<f64>,
}

impl ConcentrationCurve {
    fn zeros(grid: TimeGrid) -> Self {
        let values = vec![0.0; grid.len()];
        Self { grid, values }
    }

    pub fn times(&self) -> &[f64] {
        self.grid.points()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = CurvePoint> + '_ {
        self.grid
            .points()
            .iter()
            .zip(&self.values)
            .map(|(&time, &concentration)| CurvePoint { time, concentration })
    }
}

/// Computes the superposed concentration curve for a dose schedule.
#[derive(Debug, Clone, Copy, Default)]
pub struct Simulator {
    model: OneCompartmentModel,
}

impl Simulator {
    pub fn new() -> Self {
        Self { model: OneCompartmentModel::new() }
    }

    pub fn simulate(
        &self,
        params: &PKParameters,
        schedule: &DoseSchedule,
        grid_config: &GridConfig,
    ) -> PKResult<ConcentrationCurve> {
        let grid = TimeGrid::build(grid_config)?;
        info!(
            "Simulating {} doses over {} grid points ({} h, {} min step)",
            schedule.len(),
            grid.len(),
            grid_config.horizon_hours,
            grid_config.step_minutes
        );

        let mut curve = ConcentrationCurve::zeros(grid);

        for dose in schedule.events() {
            debug!("Dose of {:.1} mg at t={:.2} h", dose.amount, dose.timestamp);

            for (value, &t) in curve.values.iter_mut().zip(curve.grid.points()) {
                // Before administration tau clamps to 0, where the model is 0.
                let tau = (t - dose.timestamp).max(0.0);
                *value += self.model.dose_concentration(params, dose.amount, tau);
            }
        }

        for value in curve.values.iter_mut() {
            *value = value.max(0.0);
        }

        info!("Simulation completed");
        Ok(curve)
    }
}

/// Runs the default one-compartment simulator.
pub fn simulate(
    params: &PKParameters,
    schedule: &DoseSchedule,
    grid_config: &GridConfig,
) -> PKResult<ConcentrationCurve> {
    Simulator::new().simulate(params, schedule, grid_config)
}
