use super::{PKModel, PKParameters};

/// Below this |Ka - Ke| the Bateman expression is replaced by its limit.
pub const RATE_TOLERANCE: f64 = 1e-10;

/// One-compartment disposition with first-order absorption and elimination.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneCompartmentModel;

impl OneCompartmentModel {
    pub fn new() -> Self {
        Self
    }
}

impl PKModel for OneCompartmentModel {
    fn dose_concentration(&self, params: &PKParameters, amount: f64, tau: f64) -> f64 {
        let ka = params.ka;
        let ke = params.ke;

        let concentration = if (ka - ke).abs() > RATE_TOLERANCE {
            (params.f * amount * ka) / (params.vd * (ka - ke))
                * ((-ke * tau).exp() - (-ka * tau).exp())
        } else {
            // ka == ke: removable singularity, C = F*A*ka*tau*exp(-ka*tau)/V
            params.f * amount * ka * tau * (-ka * tau).exp() / params.vd
        };

        concentration.max(0.0)
    }
}
