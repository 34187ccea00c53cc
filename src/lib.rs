//! Caffeine pharmacokinetics: individual parameters, dose schedules,
//! concentration curves and clinical threshold analysis.

pub mod analysis;
pub mod clock;
pub mod config;
pub mod dosing;
pub mod error;
pub mod models;
pub mod output;
pub mod profile;
pub mod session;
pub mod simulation;

pub use analysis::{BedtimeVerdict, ConcentrationBand, ThresholdAnalyzer};
pub use dosing::{CoffeeType, DoseSchedule};
pub use error::{PKError, PKResult};
pub use models::{DoseEvent, PKParameters};
pub use profile::{adjust_parameters, PhysiologicalProfile};
pub use session::{run_session, SessionReport};
pub use simulation::{simulate, ConcentrationCurve, GridConfig, TimeGrid};
