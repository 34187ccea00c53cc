pub mod one_compartment;

use crate::error::{PKError, PKResult};
use serde::{Deserialize, Serialize};

pub use one_compartment::OneCompartmentModel;

/// Fraction of an oral caffeine dose reaching the systemic circulation.
pub const BIOAVAILABILITY: f64 = 1.0;
/// First-order absorption rate constant for oral caffeine (hr^-1).
pub const ABSORPTION_RATE: f64 = 1.2;

pub trait PKModel {
    /// Concentration (mg/L) contributed by a single dose `amount` (mg),
    /// `tau` hours after it was taken. Must be finite and non-negative.
    fn dose_concentration(&self, params: &PKParameters, amount: f64, tau: f64) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoseEvent {
    pub amount: f64,    // mg
    pub timestamp: f64, // hours from simulation start
}

impl DoseEvent {
    pub fn new(amount: f64, timestamp: f64) -> PKResult<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(PKError::Validation(format!(
                "Dose amount must be positive, got {}",
                amount
            )));
        }
        if !timestamp.is_finite() || timestamp < 0.0 {
            return Err(PKError::Validation(format!(
                "Dose timestamp must be a non-negative hour offset, got {}",
                timestamp
            )));
        }
        Ok(Self { amount, timestamp })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PKParameters {
    pub f: f64,  // Bioavailability
    pub ka: f64, // Absorption rate constant (hr^-1)
    pub vd: f64, // Volume of distribution (L)
    pub cl: f64, // Clearance (L/hr)
    pub ke: f64, // Elimination rate constant (hr^-1)
}

impl PKParameters {
    pub fn new(vd: f64, cl: f64) -> PKResult<Self> {
        if !vd.is_finite() || vd <= 0.0 {
            return Err(PKError::Validation("Vd must be positive".to_string()));
        }
        if !cl.is_finite() || cl <= 0.0 {
            return Err(PKError::Validation("CL must be positive".to_string()));
        }

        Ok(Self {
            f: BIOAVAILABILITY,
            ka: ABSORPTION_RATE,
            vd,
            cl,
            ke: cl / vd,
        })
    }

    /// Replaces the absorption rate constant, leaving the disposition untouched.
    pub fn with_absorption_rate(mut self, ka: f64) -> PKResult<Self> {
        if !ka.is_finite() || ka <= 0.0 {
            return Err(PKError::Validation("KA must be positive".to_string()));
        }
        self.ka = ka;
        Ok(self)
    }

    /// Elimination half-life in hours.
    pub fn half_life(&self) -> f64 {
        std::f64::consts::LN_2 / self.ke
    }
}
