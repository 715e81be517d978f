//! Lumped-capacitance model of the heated slab.
//!
//! Treats the slab as a single temperature `T(t)` per unit length:
//!
//! ```text
//! ρ·t·W·cp · dT/dt = q''·W − h·W·(T − T∞)
//! ```
//!
//! With `a = h/(ρ·t·cp)` and `T_ss = T∞ + q''/h` the solution is
//! `T(t) = T_ss + (T_i − T_ss)·e^(−a·t)`. The width cancels; it is kept
//! on the model so callers can compare per-length quantities.

use plancha_core::{
    biot, require_finite, require_non_negative, require_positive, ConfigError, MaterialProperties,
    ThermalError, UnreachableTargetError,
};

use crate::boundary::SurfaceConditions;

/// Largest slab Biot number for which the uniform-temperature assumption
/// is considered accurate.
pub const LUMPED_BIOT_LIMIT: f64 = 0.1;

/// Answer to a lumped-model query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LumpedSolution {
    /// Elapsed time to reach the requested temperature, s.
    Time(f64),
    /// Temperature after the requested elapsed time, K.
    Temperature(f64),
}

/// Closed-form uniform-temperature model of the slab.
#[derive(Clone, Copy, Debug)]
pub struct LumpedCapacitanceModel {
    material: MaterialProperties,
    thickness: f64,
    width: f64,
    surface: SurfaceConditions,
    initial: f64,
}

impl LumpedCapacitanceModel {
    /// Validate the inputs.
    ///
    /// `h` must be strictly positive here: with no convection the
    /// solution has no steady state.
    pub fn new(
        material: MaterialProperties,
        thickness: f64,
        width: f64,
        surface: SurfaceConditions,
        initial: f64,
    ) -> Result<Self, ConfigError> {
        material.validate()?;
        surface.validate()?;
        require_positive("convection_coefficient", surface.convection_coefficient)?;
        Ok(Self {
            material,
            thickness: require_positive("thickness", thickness)?,
            width: require_positive("width", width)?,
            surface,
            initial: require_finite("initial_temperature", initial)?,
        })
    }

    /// Rate constant `a = h/(ρ·t·cp)`, 1/s.
    fn rate(&self) -> f64 {
        self.surface.convection_coefficient
            / (self.material.volumetric_heat_capacity() * self.thickness)
    }

    /// Temperature the solution approaches, `T∞ + q''/h`.
    pub fn steady_state(&self) -> f64 {
        self.surface.flux_balance_temperature()
    }

    /// Time constant `1/a`, s.
    pub fn time_constant(&self) -> f64 {
        1.0 / self.rate()
    }

    /// Slab Biot number `h·thickness/k`.
    pub fn biot(&self) -> f64 {
        biot(
            self.surface.convection_coefficient,
            self.material.conductivity,
            self.thickness,
        )
    }

    /// Whether the Biot number is small enough for the model to apply.
    pub fn is_valid(&self) -> bool {
        self.biot() < LUMPED_BIOT_LIMIT
    }

    /// Initial temperature, K.
    pub fn initial(&self) -> f64 {
        self.initial
    }

    /// Slab width, m.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Answer exactly one of "when does it reach `final_temperature`?" or
    /// "what temperature after `time`?".
    ///
    /// ```
    /// use plancha_core::MaterialProperties;
    /// use plancha_propagators::{LumpedCapacitanceModel, LumpedSolution, SurfaceConditions};
    ///
    /// let surface = SurfaceConditions::new(300.0, 15.0, 4500.0).unwrap();
    /// let model = LumpedCapacitanceModel::new(
    ///     MaterialProperties::aluminum(), 0.01, 0.45, surface, 300.0,
    /// ).unwrap();
    /// let Ok(LumpedSolution::Time(t)) = model.solve(Some(500.0), None) else {
    ///     panic!("500 K is below the 600 K steady state");
    /// };
    /// assert!(t > 0.0);
    /// assert!(model.solve(None, None).is_err());
    /// ```
    pub fn solve(
        &self,
        final_temperature: Option<f64>,
        time: Option<f64>,
    ) -> Result<LumpedSolution, ThermalError> {
        match (final_temperature, time) {
            (Some(target), None) => Ok(LumpedSolution::Time(self.solve_for_time(target)?)),
            (None, Some(t)) => Ok(LumpedSolution::Temperature(self.solve_for_temperature(t)?)),
            (Some(_), Some(_)) => Err(ConfigError::LumpedQuery { both: true }.into()),
            (None, None) => Err(ConfigError::LumpedQuery { both: false }.into()),
        }
    }

    /// Time for the uniform temperature to reach `target`, s.
    ///
    /// Fails with [`UnreachableTargetError`] if `target` is at or beyond
    /// the steady state, or lies on the far side of the initial
    /// temperature from it.
    pub fn solve_for_time(&self, target: f64) -> Result<f64, ThermalError> {
        let target = require_finite("final_temperature", target)?;
        if target == self.initial {
            return Ok(0.0);
        }
        let steady = self.steady_state();
        let ratio = (target - steady) / (self.initial - steady);
        // ratio > 1 would need negative time; NaN falls through too.
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(UnreachableTargetError {
                target,
                initial: self.initial,
                steady_state: steady,
            }
            .into());
        }
        Ok(-ratio.ln() / self.rate())
    }

    /// Uniform temperature after `time` seconds, K.
    pub fn solve_for_temperature(&self, time: f64) -> Result<f64, ConfigError> {
        let time = require_non_negative("time", time)?;
        let steady = self.steady_state();
        Ok(steady + (self.initial - steady) * (-self.rate() * time).exp())
    }
}
