//! Scalar outputs of one scenario.
//!
//! Runs the 2D simulation and the lumped model side by side and derives
//! the energy figures at the operating (threshold) temperature:
//!
//! ```text
//! lumped steady state     T∞ + q''/h
//! top steady state        T∞ + q''·W / (h·(W + 2t))
//! stored energy           ρ·W·t·cp·(T_op − T_i)        J/m
//! average power           stored energy / time          W/m
//! convective loss         h·(W + 2t)·(T_op − T∞)        W/m
//! holding flux            convective loss / W           W/m²
//! ```

use std::fmt;

use log::info;

use plancha_core::{Dimension, Quantity, ThermalError, Unit};

use crate::config::ResolvedScenario;
use crate::metrics::RunMetrics;
use crate::simulator::Simulator;

/// Times to threshold recomputed with half the convective coefficient.
#[derive(Clone, Debug, PartialEq)]
pub struct HalvedConvection {
    /// 2D time, if reached within the bound.
    pub simulated_time: Option<Quantity>,
    /// Lumped time, if reachable.
    pub lumped_time: Option<Quantity>,
}

/// Every scalar the scenario produces.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioReport {
    /// Slab Biot number `h·t/k`.
    pub slab_biot: Quantity,
    /// Node Biot number `h·dx/k`.
    pub node_biot: Quantity,
    /// Fourier number of the time step marched with.
    pub fourier: Quantity,
    /// Time step marched with.
    pub dt: Quantity,
    /// Largest stable time step.
    pub dt_max: Quantity,
    /// Whether the slab Biot number is small enough for the lumped model.
    pub lumped_valid: bool,
    /// 2D time to threshold, if reached within the bound.
    pub simulated_time: Option<Quantity>,
    /// Steps the 2D run took.
    pub steps: u64,
    /// Lumped time to threshold, if reachable.
    pub lumped_time: Option<Quantity>,
    /// Lumped steady state `T∞ + q''/h`.
    pub lumped_steady_state: Quantity,
    /// Energy-balance steady state of the top face `T∞ + q''W/(h(W + 2t))`.
    pub top_steady_state: Quantity,
    /// Energy stored per unit length between the initial and operating
    /// temperatures.
    pub stored_energy: Quantity,
    /// Stored energy over the 2D time to threshold.
    pub average_power: Option<Quantity>,
    /// Convective loss per unit length at the operating temperature.
    pub convective_loss: Quantity,
    /// Surface flux that holds the operating temperature at steady state.
    pub holding_flux: Quantity,
    /// Optional rerun with `h/2`.
    pub halved: Option<HalvedConvection>,
    /// Metrics of the main 2D run.
    pub metrics: RunMetrics,
}

fn lumped_time(scenario: &ResolvedScenario) -> Result<Option<Quantity>, ThermalError> {
    match scenario
        .lumped_model()?
        .solve_for_time(scenario.threshold)
    {
        Ok(t) => Ok(Some(Quantity::from_canonical(t, Dimension::TIME))),
        Err(ThermalError::UnreachableTarget(e)) => {
            info!("lumped model: {e}");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn simulated_time(scenario: &ResolvedScenario) -> Result<(Option<f64>, Simulator), ThermalError> {
    let mut sim = Simulator::from_scenario(scenario)?;
    let result = sim.run()?;
    Ok((result.time_to_threshold(), sim))
}

impl ScenarioReport {
    /// Run the scenario and derive every output.
    pub fn compute(scenario: &ResolvedScenario, with_halved_h: bool) -> Result<Self, ThermalError> {
        let (time, sim) = simulated_time(scenario)?;
        let lumped = lumped_time(scenario)?;

        let h = scenario.surface.convection_coefficient;
        let ambient = scenario.surface.ambient;
        let flux = scenario.surface.heat_flux;
        let (w, t) = (scenario.width, scenario.thickness);
        let t_op = scenario.threshold;
        let exposed = w + 2.0 * t;

        let stored = scenario.material.volumetric_heat_capacity()
            * w
            * t
            * (t_op - scenario.initial_temperature);
        let loss = h * exposed * (t_op - ambient);

        let halved = if with_halved_h {
            let half = scenario.with_convection(h / 2.0)?;
            let (half_time, _) = simulated_time(&half)?;
            Some(HalvedConvection {
                simulated_time: half_time.map(|v| Quantity::from_canonical(v, Dimension::TIME)),
                lumped_time: lumped_time(&half)?,
            })
        } else {
            None
        };

        let dimensionless = |v| Quantity::from_canonical(v, Dimension::DIMENSIONLESS);
        let temperature = |v| Quantity::from_canonical(v, Dimension::TEMPERATURE);
        let seconds = |v| Quantity::from_canonical(v, Dimension::TIME);

        Ok(Self {
            slab_biot: dimensionless(scenario.stability.biot_slab),
            node_biot: dimensionless(scenario.stability.biot_node),
            fourier: dimensionless(sim.grid().fourier()),
            dt: seconds(scenario.dt),
            dt_max: seconds(scenario.stability.dt_max),
            lumped_valid: scenario.lumped_model()?.is_valid(),
            simulated_time: time.map(seconds),
            steps: sim.metrics().steps,
            lumped_time: lumped,
            lumped_steady_state: temperature(scenario.surface.flux_balance_temperature()),
            top_steady_state: temperature(ambient + flux * w / (h * exposed)),
            stored_energy: Quantity::from_canonical(stored, Dimension::ENERGY_PER_LENGTH),
            average_power: time
                .filter(|&v| v > 0.0)
                .map(|v| Quantity::from_canonical(stored / v, Dimension::POWER_PER_LENGTH)),
            convective_loss: Quantity::from_canonical(loss, Dimension::POWER_PER_LENGTH),
            holding_flux: Quantity::from_canonical(loss / w, Dimension::HEAT_FLUX),
            halved,
            metrics: sim.metrics().clone(),
        })
    }
}

fn minutes(q: &Option<Quantity>) -> Result<String, fmt::Error> {
    match q {
        Some(q) => Ok(format!("{:.1} min", q.value_in(Unit::Minute).map_err(|_| fmt::Error)?)),
        None => Ok("not reached".to_string()),
    }
}

fn celsius(q: Quantity) -> Result<f64, fmt::Error> {
    q.value_in(Unit::Celsius).map_err(|_| fmt::Error)
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Biot (slab) {:.4e}   Fourier {:.4}   dt {:.4} s (max {:.4} s)",
            self.slab_biot.magnitude(),
            self.fourier.magnitude(),
            self.dt.magnitude(),
            self.dt_max.magnitude()
        )?;
        writeln!(
            f,
            "time to threshold: 2D {}, lumped {}{}",
            minutes(&self.simulated_time)?,
            minutes(&self.lumped_time)?,
            if self.lumped_valid {
                ""
            } else {
                " (Bi >= 0.1, lumped model inaccurate)"
            }
        )?;
        writeln!(
            f,
            "steady state: lumped {:.1} °C, top face {:.1} °C",
            celsius(self.lumped_steady_state)?,
            celsius(self.top_steady_state)?
        )?;
        write!(f, "stored energy {:.4e} J/m", self.stored_energy.magnitude())?;
        if let Some(p) = self.average_power {
            write!(f, ", average power {:.1} W/m", p.magnitude())?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "convective loss {:.1} W/m, holding flux {:.1} W/m²",
            self.convective_loss.magnitude(),
            self.holding_flux.magnitude()
        )?;
        if let Some(h) = &self.halved {
            writeln!(
                f,
                "with h/2: 2D {}, lumped {}",
                minutes(&h.simulated_time)?,
                minutes(&h.lumped_time)?
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RunLimit, ScenarioConfig};
    use plancha_core::Measured;
    use plancha_test_utils::{assert_close, PLANCHA_AMBIENT};

    fn short_scenario() -> ResolvedScenario {
        let mut config = ScenarioConfig::default();
        config.limit = RunLimit::MaxSteps(50);
        config.record_every = 10;
        config.validate().unwrap()
    }

    #[test]
    fn energy_figures_follow_closed_forms() {
        let s = short_scenario();
        let report = ScenarioReport::compute(&s, false).unwrap();
        assert!(report.simulated_time.is_none());
        assert!(report.average_power.is_none());
        assert_eq!(report.steps, 50);

        let rho_cp = 2702.0 * 903.0;
        let stored = rho_cp * 0.45 * 0.01 * (s.threshold - 305.0);
        assert_close(report.stored_energy.magnitude(), stored, 1e-9);
        assert_eq!(report.stored_energy.dimension(), Dimension::ENERGY_PER_LENGTH);

        let loss = 15.0 * 0.47 * (s.threshold - PLANCHA_AMBIENT);
        assert_close(report.convective_loss.magnitude(), loss, 1e-9);
        assert_close(report.holding_flux.magnitude(), loss / 0.45, 1e-9);

        assert_close(report.lumped_steady_state.magnitude(), PLANCHA_AMBIENT + 300.0, 1e-12);
        let top = PLANCHA_AMBIENT + 4500.0 * 0.45 / (15.0 * 0.47);
        assert_close(report.top_steady_state.magnitude(), top, 1e-12);
        assert!(report.top_steady_state.magnitude() < report.lumped_steady_state.magnitude());
    }

    #[test]
    fn lumped_time_present_and_valid() {
        let report = ScenarioReport::compute(&short_scenario(), false).unwrap();
        assert!(report.lumped_valid);
        let t = report.lumped_time.unwrap().value_in(Unit::Second).unwrap();
        assert!((2150.0..2220.0).contains(&t), "{t}");
    }

    #[test]
    fn unreachable_threshold_is_none_not_error() {
        let mut config = ScenarioConfig::default();
        config.limit = RunLimit::MaxSteps(5);
        config.threshold = Measured::new(400.0, Unit::Celsius);
        let report = ScenarioReport::compute(&config.validate().unwrap(), false).unwrap();
        assert!(report.lumped_time.is_none());
        assert!(report.simulated_time.is_none());
    }

    #[test]
    fn halving_h_shortens_lumped_time() {
        let report = ScenarioReport::compute(&short_scenario(), true).unwrap();
        let halved = report.halved.as_ref().unwrap();
        let full = report.lumped_time.unwrap().magnitude();
        let half = halved.lumped_time.unwrap().magnitude();
        assert!(half < full);
        let text = report.to_string();
        assert!(text.contains("with h/2"));
        assert!(text.contains("not reached"));
    }
}
