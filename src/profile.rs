use crate::error::{PKError, PKResult};
use crate::models::PKParameters;
use log::debug;
use serde::{Deserialize, Serialize};

pub const MIN_WEIGHT_KG: f64 = 30.0;
pub const MAX_WEIGHT_KG: f64 = 150.0;

/// Volume of distribution per kg body weight (L/kg).
pub const VD_PER_KG: f64 = 0.6;
/// Clearance per kg body weight (L/hr/kg).
pub const CL_PER_KG: f64 = 0.06;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SmokingStatus {
    Smoker,
    NonSmoker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LiverFunction {
    Normal,
    Mild,
    Severe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetabolismStatus {
    Normal,
    Slow,
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysiologicalProfile {
    pub weight: f64, // kg
    pub sex: Sex,
    pub smoking: SmokingStatus,
    pub liver: LiverFunction,
    pub metabolism: MetabolismStatus,
}

impl PhysiologicalProfile {
    pub fn validate(&self) -> PKResult<()> {
        if !self.weight.is_finite() || self.weight < MIN_WEIGHT_KG || self.weight > MAX_WEIGHT_KG {
            return Err(PKError::Validation(format!(
                "Weight must be within [{}, {}] kg, got {}",
                MIN_WEIGHT_KG, MAX_WEIGHT_KG, self.weight
            )));
        }
        Ok(())
    }
}

impl Default for PhysiologicalProfile {
    fn default() -> Self {
        Self {
            weight: 70.0,
            sex: Sex::Male,
            smoking: SmokingStatus::NonSmoker,
            liver: LiverFunction::Normal,
            metabolism: MetabolismStatus::Normal,
        }
    }
}

/// Derives individual caffeine disposition parameters from a profile.
///
/// Weight-scaled baselines are adjusted by multiplicative factors applied in a
/// fixed order: metabolism, smoking, sex, liver function.
pub fn adjust_parameters(profile: &PhysiologicalProfile) -> PKResult<PKParameters> {
    profile.validate()?;

    let mut vd = VD_PER_KG * profile.weight;
    let mut cl = CL_PER_KG * profile.weight;

    cl *= match profile.metabolism {
        MetabolismStatus::Slow => 0.3,
        MetabolismStatus::Fast => 1.3,
        MetabolismStatus::Normal => 1.0,
    };

    if profile.smoking == SmokingStatus::Smoker {
        cl *= 1.5;
    }

    if profile.sex == Sex::Female {
        vd *= 0.85;
        cl *= 0.85;
    }

    cl *= match profile.liver {
        LiverFunction::Mild => 0.8,
        LiverFunction::Severe => 0.5,
        LiverFunction::Normal => 1.0,
    };

    let params = PKParameters::new(vd, cl)?;
    debug!(
        "Adjusted parameters: Vd={:.3} L, CL={:.3} L/h, Ke={:.4} 1/h",
        params.vd, params.cl, params.ke
    );

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_adult() {
        let params = adjust_parameters(&PhysiologicalProfile::default()).unwrap();
        assert_relative_eq!(params.vd, 42.0, epsilon = 1e-9);
        assert_relative_eq!(params.cl, 4.2, epsilon = 1e-9);
        assert_relative_eq!(params.ke, 0.1, epsilon = 1e-9);
        assert_relative_eq!(params.ka, 1.2);
        assert_relative_eq!(params.f, 1.0);
    }

    #[test]
    fn test_all_adjustments_compound() {
        let profile = PhysiologicalProfile {
            weight: 60.0,
            sex: Sex::Female,
            smoking: SmokingStatus::Smoker,
            liver: LiverFunction::Mild,
            metabolism: MetabolismStatus::Fast,
        };
        let params = adjust_parameters(&profile).unwrap();

        let vd = 0.6 * 60.0 * 0.85;
        let cl = 0.06 * 60.0 * 1.3 * 1.5 * 0.85 * 0.8;
        assert_relative_eq!(params.vd, vd, epsilon = 1e-9);
        assert_relative_eq!(params.cl, cl, epsilon = 1e-9);
        assert_relative_eq!(params.ke, cl / vd, epsilon = 1e-9);
    }

    #[test]
    fn test_slow_metabolism_and_severe_liver() {
        let profile = PhysiologicalProfile {
            metabolism: MetabolismStatus::Slow,
            liver: LiverFunction::Severe,
            ..PhysiologicalProfile::default()
        };
        let params = adjust_parameters(&profile).unwrap();
        assert_relative_eq!(params.vd, 42.0, epsilon = 1e-9);
        assert_relative_eq!(params.cl, 4.2 * 0.3 * 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_weight_bounds() {
        for &weight in &[30.0, 150.0] {
            let profile = PhysiologicalProfile { weight, ..Default::default() };
            assert!(adjust_parameters(&profile).is_ok());
        }
        for &weight in &[29.9, 150.1, f64::NAN] {
            let profile = PhysiologicalProfile { weight, ..Default::default() };
            assert!(matches!(adjust_parameters(&profile), Err(PKError::Validation(_))));
        }
    }
}
