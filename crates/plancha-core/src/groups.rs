//! Dimensionless groups: Biot and Fourier numbers.

use serde::{Deserialize, Serialize};

use crate::error::{require_non_negative, require_positive, ConfigError};

/// Biot number `h·L/k`: convective over conductive resistance.
pub fn biot(h: f64, k: f64, length: f64) -> f64 {
    h * length / k
}

/// Fourier number `alpha·dt/dx²`: diffusion over storage per step.
pub fn fourier(alpha: f64, dt: f64, dx: f64) -> f64 {
    alpha * dt / (dx * dx)
}

/// Biot and Fourier numbers for one run.
///
/// Computed from the inputs of that run; never carried over to a run
/// with a different material, convective coefficient, or spacing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StabilityParameters {
    /// Biot number over the characteristic length supplied.
    pub biot: f64,
    /// Fourier number for the time step actually marched with.
    pub fourier: f64,
}

impl StabilityParameters {
    /// Compute both groups, validating inputs.
    pub fn new(
        h: f64,
        k: f64,
        length: f64,
        alpha: f64,
        dt: f64,
        dx: f64,
    ) -> Result<Self, ConfigError> {
        let h = require_non_negative("convection_coefficient", h)?;
        let k = require_positive("conductivity", k)?;
        let length = require_positive("characteristic_length", length)?;
        let alpha = require_positive("diffusivity", alpha)?;
        let dt = require_positive("dt", dt)?;
        let dx = require_positive("spacing", dx)?;
        Ok(Self {
            biot: biot(h, k, length),
            fourier: fourier(alpha, dt, dx),
        })
    }
}
