//! Surface boundary conditions shared by every model.

use plancha_core::{require_finite, require_non_negative, ConfigError};

/// Thermal conditions on the slab surfaces, in SI units.
///
/// The heated face receives `heat_flux`; every other exposed face loses
/// heat to air at `ambient` through `convection_coefficient`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceConditions {
    /// Ambient air temperature, K.
    pub ambient: f64,
    /// Convective heat-transfer coefficient `h`, W/(m²·K).
    pub convection_coefficient: f64,
    /// Constant surface flux on the heated face, W/m².
    pub heat_flux: f64,
}

impl SurfaceConditions {
    /// Create validated surface conditions.
    pub fn new(ambient: f64, convection_coefficient: f64, heat_flux: f64) -> Result<Self, ConfigError> {
        let conditions = Self {
            ambient,
            convection_coefficient,
            heat_flux,
        };
        conditions.validate()?;
        Ok(conditions)
    }

    /// Check that the ambient and flux are finite and `h` is non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_finite("ambient", self.ambient)?;
        require_non_negative("convection_coefficient", self.convection_coefficient)?;
        require_finite("heat_flux", self.heat_flux)?;
        Ok(())
    }

    /// The same conditions with a different convective coefficient.
    pub fn with_convection(self, convection_coefficient: f64) -> Self {
        Self {
            convection_coefficient,
            ..self
        }
    }

    /// Steady-state temperature of a surface balancing the flux against
    /// convection over the same area: `T∞ + q''/h`.
    ///
    /// Infinite when `h` is zero and the flux is positive.
    pub fn flux_balance_temperature(&self) -> f64 {
        self.ambient + self.heat_flux / self.convection_coefficient
    }
}
