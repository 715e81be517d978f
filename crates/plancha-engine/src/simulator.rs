//! Time-marching driver with threshold detection.
//!
//! Each iteration is `step(); commit(); t += dt; sample monitor`. The run
//! stops at the first committed step whose monitored temperature is at
//! or above the threshold, or when the step budget derived from the
//! [`RunBound`] is spent. The crossing time is the time of that step;
//! there is no interpolation between steps.

use std::time::Instant;

use log::{debug, info, warn};

use plancha_core::{require_finite, require_non_negative, require_positive, ConfigError, StepError};
use plancha_propagators::{FieldSnapshot, FiniteDifferenceGrid};

use crate::config::ResolvedScenario;
use crate::metrics::RunMetrics;
use crate::series::TimeSeries;

/// Upper limit on samples preallocated for the time series.
const MAX_PREALLOCATED_SAMPLES: u64 = 1 << 20;

/// Relative slack when comparing a step time with a requested capture time.
const CAPTURE_TOLERANCE: f64 = 1e-9;

/// Hard limit on how long a run may march.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RunBound {
    /// At most this many steps.
    MaxSteps(u64),
    /// At most this much simulated time, s. Never overshot.
    MaxTime(f64),
}

impl RunBound {
    /// Number of steps of size `dt` the bound allows.
    pub fn step_budget(&self, dt: f64) -> u64 {
        match *self {
            Self::MaxSteps(n) => n,
            // Guard against 3600 / dt landing just below an integer.
            Self::MaxTime(t) => (t / dt * (1.0 + 1e-12)).floor() as u64,
        }
    }
}

/// Outcome of a run. Not reaching the threshold is a valid result.
#[derive(Clone, Debug, PartialEq)]
pub enum SimulationResult {
    /// The monitored node crossed the threshold.
    Reached {
        /// Simulated time of the first step at or above the threshold, s.
        time_to_threshold: f64,
        /// Steps taken.
        steps: u64,
        /// Field at the crossing step.
        field: FieldSnapshot,
        /// Monitored series up to and including the crossing step.
        series: TimeSeries,
    },
    /// The bound was spent first.
    NotReached {
        /// Field at the last step.
        field: FieldSnapshot,
        /// Monitored series over the whole run.
        series: TimeSeries,
    },
}

impl SimulationResult {
    /// Whether the threshold was reached.
    pub fn is_reached(&self) -> bool {
        matches!(self, Self::Reached { .. })
    }

    /// Crossing time, if reached.
    pub fn time_to_threshold(&self) -> Option<f64> {
        match self {
            Self::Reached {
                time_to_threshold, ..
            } => Some(*time_to_threshold),
            Self::NotReached { .. } => None,
        }
    }

    /// Final field.
    pub fn field(&self) -> &FieldSnapshot {
        match self {
            Self::Reached { field, .. } | Self::NotReached { field, .. } => field,
        }
    }

    /// Monitored series.
    pub fn series(&self) -> &TimeSeries {
        match self {
            Self::Reached { series, .. } | Self::NotReached { series, .. } => series,
        }
    }
}

/// Builder for [`Simulator`].
///
/// Threshold and bound are required up front; the monitored node defaults
/// to the top-face centre, recording to every step, and no field captures.
pub struct SimulatorBuilder {
    grid: FiniteDifferenceGrid,
    threshold: f64,
    bound: RunBound,
    monitor: Option<(usize, usize)>,
    record_every: u64,
    capture_at: Vec<f64>,
}

impl SimulatorBuilder {
    /// Monitor node `(row, col)` instead of the top-face centre.
    pub fn monitor(mut self, row: usize, col: usize) -> Self {
        self.monitor = Some((row, col));
        self
    }

    /// Record the monitored temperature every `n` steps.
    ///
    /// The first, crossing and final steps are always recorded.
    pub fn record_every(mut self, n: u64) -> Self {
        self.record_every = n;
        self
    }

    /// Capture the whole field at the first step at or after each time.
    pub fn capture_at(mut self, times: Vec<f64>) -> Self {
        self.capture_at = times;
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<Simulator, ConfigError> {
        let threshold = require_finite("threshold", self.threshold)?;
        match self.bound {
            RunBound::MaxSteps(0) => {
                return Err(ConfigError::InvalidRunBound {
                    reason: "max_steps must be at least 1".to_string(),
                })
            }
            RunBound::MaxSteps(_) => {}
            RunBound::MaxTime(t) => {
                let t = require_positive("max_time", t)?;
                let dt = self.grid.dt();
                if self.bound.step_budget(dt) == 0 {
                    return Err(ConfigError::InvalidRunBound {
                        reason: format!("max_time {t} s is shorter than one step of {dt} s"),
                    });
                }
            }
        }
        if self.record_every == 0 {
            return Err(ConfigError::NonPositive {
                name: "record_every",
                value: 0.0,
            });
        }
        let grid_geometry = self.grid.grid();
        let (row, col) = self.monitor.unwrap_or_else(|| grid_geometry.top_centre());
        let monitor = grid_geometry.checked_index(row, col)?;
        let mut capture_at = self
            .capture_at
            .into_iter()
            .map(|t| require_non_negative("capture_at", t))
            .collect::<Result<Vec<_>, _>>()?;
        capture_at.sort_by(f64::total_cmp);

        Ok(Simulator {
            grid: self.grid,
            threshold,
            bound: self.bound,
            monitor,
            monitor_coord: (row, col),
            record_every: self.record_every,
            capture_at,
            captures: Vec::new(),
            metrics: RunMetrics::default(),
        })
    }
}

/// Marches a [`FiniteDifferenceGrid`] until a threshold or a bound.
pub struct Simulator {
    grid: FiniteDifferenceGrid,
    threshold: f64,
    bound: RunBound,
    monitor: usize,
    monitor_coord: (usize, usize),
    record_every: u64,
    capture_at: Vec<f64>,
    captures: Vec<FieldSnapshot>,
    metrics: RunMetrics,
}

impl Simulator {
    /// Start building a simulator around `grid`.
    pub fn builder(grid: FiniteDifferenceGrid, threshold: f64, bound: RunBound) -> SimulatorBuilder {
        SimulatorBuilder {
            grid,
            threshold,
            bound,
            monitor: None,
            record_every: 1,
            capture_at: Vec::new(),
        }
    }

    /// A simulator for a validated scenario, at its initial temperature.
    pub fn from_scenario(scenario: &ResolvedScenario) -> Result<Self, ConfigError> {
        Self::builder(scenario.build_grid()?, scenario.threshold, scenario.bound)
            .monitor(scenario.monitor.0, scenario.monitor.1)
            .record_every(scenario.record_every)
            .capture_at(scenario.capture_at.clone())
            .build()
    }

    /// The grid in its current state.
    pub fn grid(&self) -> &FiniteDifferenceGrid {
        &self.grid
    }

    /// Monitored node `(row, col)`.
    pub fn monitor(&self) -> (usize, usize) {
        self.monitor_coord
    }

    /// Metrics of the most recent run.
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Field captures of the most recent run, in time order.
    pub fn captures(&self) -> &[FieldSnapshot] {
        &self.captures
    }

    fn monitored(&self) -> f64 {
        self.grid.field()[self.monitor]
    }

    /// Non-finite values never count as a crossing.
    fn crosses(&self, value: f64) -> bool {
        value.is_finite() && value >= self.threshold
    }

    fn capture_due(&mut self, time: f64, next: &mut usize, dt: f64) {
        while *next < self.capture_at.len() && time >= self.capture_at[*next] - CAPTURE_TOLERANCE * dt
        {
            self.captures.push(self.grid.snapshot(time));
            *next += 1;
        }
    }

    /// March from the grid's current field until the threshold or bound.
    ///
    /// Simulated time is measured from the start of this call. An initial
    /// field already at the threshold is reported as reached at time zero.
    pub fn run(&mut self) -> Result<SimulationResult, StepError> {
        let dt = self.grid.dt();
        let budget = self.bound.step_budget(dt);
        let cells = self.grid.grid().cell_count() as u64;
        let capacity = (budget / self.record_every).min(MAX_PREALLOCATED_SAMPLES) as usize + 2;
        let mut series = TimeSeries::with_capacity(capacity);
        let mut next_capture = 0;
        self.captures.clear();

        debug!(
            "run start: budget {budget} steps of {dt} s, monitor {:?}, threshold {} K",
            self.monitor_coord, self.threshold
        );
        let started = Instant::now();

        let mut monitored = self.monitored();
        series.push(0.0, monitored);
        self.capture_due(0.0, &mut next_capture, dt);
        let mut peak = if monitored.is_finite() {
            monitored
        } else {
            f64::NEG_INFINITY
        };
        let mut warned = false;
        let mut reached = self.crosses(monitored);
        let mut steps = 0u64;

        while !reached && steps < budget {
            self.grid.step();
            self.grid.commit()?;
            steps += 1;
            let time = steps as f64 * dt;
            monitored = self.monitored();
            if monitored.is_finite() {
                peak = peak.max(monitored);
            } else if !warned {
                warn!(
                    "monitored temperature became {monitored} at t = {time} s (step {steps}); \
                     continuing to the run bound"
                );
                warned = true;
            }
            self.capture_due(time, &mut next_capture, dt);
            reached = self.crosses(monitored);
            if reached || steps % self.record_every == 0 || steps == budget {
                series.push(time, monitored);
            }
        }

        let time = steps as f64 * dt;
        self.metrics = RunMetrics {
            steps,
            simulated_time: time,
            node_updates: steps * cells,
            wall_us: u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
            peak_temperature: peak,
        };
        let field = self.grid.snapshot(time);

        if reached {
            info!("threshold {} K reached at t = {time} s after {steps} steps", self.threshold);
            Ok(SimulationResult::Reached {
                time_to_threshold: time,
                steps,
                field,
                series,
            })
        } else {
            info!(
                "threshold {} K not reached within {steps} steps ({time} s); monitor at {monitored} K",
                self.threshold
            );
            Ok(SimulationResult::NotReached { field, series })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plancha_core::MaterialProperties;
    use plancha_propagators::SurfaceConditions;
    use plancha_test_utils::{aluminum, assert_close, small_grid};

    fn heated(rows: usize, cols: usize, initial: f64) -> FiniteDifferenceGrid {
        let grid = small_grid(rows, cols);
        let material = aluminum();
        let dx = grid.spacing();
        let surface = SurfaceConditions::new(300.0, 15.0, 50_000.0).unwrap();
        let dt = 0.2 * dx * dx / material.diffusivity();
        FiniteDifferenceGrid::new(grid, material, surface, dt, initial).unwrap()
    }

    #[test]
    fn step_budget_from_time() {
        assert_eq!(RunBound::MaxTime(1.0).step_budget(0.1), 10);
        assert_eq!(RunBound::MaxTime(1.05).step_budget(0.1), 10);
        assert_eq!(RunBound::MaxTime(0.05).step_budget(0.1), 0);
        assert_eq!(RunBound::MaxSteps(7).step_budget(0.1), 7);
    }

    #[test]
    fn reached_at_time_zero_when_already_hot() {
        let mut sim = Simulator::builder(heated(3, 5, 400.0), 350.0, RunBound::MaxSteps(10))
            .build()
            .unwrap();
        let result = sim.run().unwrap();
        assert_eq!(result.time_to_threshold(), Some(0.0));
        match result {
            SimulationResult::Reached { steps, series, .. } => {
                assert_eq!(steps, 0);
                assert_eq!(series.len(), 1);
            }
            other => panic!("expected reached, got {other:?}"),
        }
        assert_eq!(sim.metrics().steps, 0);
    }

    #[test]
    fn short_bound_is_not_reached() {
        let mut sim = Simulator::builder(heated(3, 5, 300.0), 1000.0, RunBound::MaxSteps(25))
            .build()
            .unwrap();
        let result = sim.run().unwrap();
        assert!(!result.is_reached());
        assert_eq!(result.series().len(), 26);
        assert_eq!(sim.metrics().steps, 25);
        assert_eq!(sim.metrics().node_updates, 25 * 15);
        assert_eq!(sim.grid().steps_committed(), 25);
    }

    #[test]
    fn max_time_is_never_overshot() {
        let grid = heated(3, 5, 300.0);
        let dt = grid.dt();
        let mut sim = Simulator::builder(grid, 1000.0, RunBound::MaxTime(10.5 * dt))
            .build()
            .unwrap();
        let result = sim.run().unwrap();
        assert!(!result.is_reached());
        assert_eq!(sim.metrics().steps, 10);
        assert!(sim.metrics().simulated_time <= 10.5 * dt);
    }

    #[test]
    fn crossing_is_first_step_at_or_above() {
        let mut sim = Simulator::builder(heated(3, 5, 300.0), 300.5, RunBound::MaxSteps(100_000))
            .monitor(0, 2)
            .record_every(1_000)
            .build()
            .unwrap();
        let result = sim.run().unwrap();
        let series = result.series().clone();
        let (t_last, v_last) = series.last().unwrap();
        assert!(v_last >= 300.5);
        assert_eq!(result.time_to_threshold(), Some(t_last));
        let steps = sim.metrics().steps;
        assert_close(t_last, steps as f64 * sim.grid().dt(), 1e-12);
        // The step before the crossing was still below.
        let mut replay = Simulator::builder(heated(3, 5, 300.0), 1e9, RunBound::MaxSteps(steps - 1))
            .monitor(0, 2)
            .build()
            .unwrap();
        let before = replay.run().unwrap();
        assert!(before.series().last().unwrap().1 < 300.5);
    }

    #[test]
    fn records_every_nth_plus_final() {
        let mut sim = Simulator::builder(heated(3, 4, 300.0), 1e9, RunBound::MaxSteps(10))
            .record_every(4)
            .build()
            .unwrap();
        let result = sim.run().unwrap();
        let dt = sim.grid().dt();
        let times: Vec<f64> = result.series().times().to_vec();
        let expected = [0.0, 4.0 * dt, 8.0 * dt, 10.0 * dt];
        assert_eq!(times.len(), expected.len());
        for (t, e) in times.iter().zip(expected) {
            assert_close(*t, e, 1e-12);
        }
    }

    #[test]
    fn captures_first_step_at_or_after() {
        let grid = heated(3, 4, 300.0);
        let dt = grid.dt();
        let mut sim = Simulator::builder(grid, 1e9, RunBound::MaxSteps(10))
            .capture_at(vec![2.5 * dt, 0.0, 50.0 * dt])
            .build()
            .unwrap();
        sim.run().unwrap();
        let captures = sim.captures();
        assert_eq!(captures.len(), 2);
        assert_eq!(captures[0].time(), 0.0);
        assert_close(captures[1].time(), 3.0 * dt, 1e-12);
    }

    #[test]
    fn builder_validation() {
        assert!(matches!(
            Simulator::builder(heated(3, 3, 300.0), 400.0, RunBound::MaxSteps(0)).build(),
            Err(ConfigError::InvalidRunBound { .. })
        ));
        assert!(matches!(
            Simulator::builder(heated(3, 3, 300.0), f64::NAN, RunBound::MaxSteps(1)).build(),
            Err(ConfigError::NonFinite { .. })
        ));
        assert!(matches!(
            Simulator::builder(heated(3, 3, 300.0), 400.0, RunBound::MaxSteps(1))
                .monitor(0, 3)
                .build(),
            Err(ConfigError::MonitorOutOfBounds { .. })
        ));
        assert!(matches!(
            Simulator::builder(heated(3, 3, 300.0), 400.0, RunBound::MaxSteps(1))
                .record_every(0)
                .build(),
            Err(ConfigError::NonPositive { .. })
        ));
    }

    #[test]
    fn max_time_shorter_than_one_step_is_rejected() {
        let grid = heated(3, 3, 300.0);
        let dt = grid.dt();
        assert!(matches!(
            Simulator::builder(grid, 400.0, RunBound::MaxTime(0.5 * dt)).build(),
            Err(ConfigError::InvalidRunBound { .. })
        ));
        let mut sim = Simulator::builder(heated(3, 3, 300.0), 1e9, RunBound::MaxTime(dt))
            .build()
            .unwrap();
        sim.run().unwrap();
        assert_eq!(sim.metrics().steps, 1);
    }

    #[test]
    fn diverging_field_runs_to_bound() {
        let grid = small_grid(3, 5);
        let material = MaterialProperties::aluminum();
        let dx = grid.spacing();
        let surface = SurfaceConditions::new(300.0, 15.0, 4500.0).unwrap();
        let dt = 50.0 * dx * dx / material.diffusivity();
        let fdg = FiniteDifferenceGrid::new(grid, material, surface, dt, 300.0).unwrap();
        // No finite value exceeds f64::MAX, and overflowed values never cross.
        let mut sim = Simulator::builder(fdg, f64::MAX, RunBound::MaxSteps(2_000))
            .monitor(1, 2)
            .build()
            .unwrap();
        let result = sim.run().unwrap();
        assert!(!result.is_reached());
        assert_eq!(sim.metrics().steps, 2_000);
        let (_, last) = result.series().last().unwrap();
        assert!(!last.is_finite());
        assert!(sim.metrics().peak_temperature.is_finite());
        assert!(sim.metrics().peak_temperature > 1e300);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn time_budget_fits_inside_bound(t in 1e-2f64..1e4, dt in 1e-3f64..10.0) {
                let n = RunBound::MaxTime(t).step_budget(dt) as f64;
                prop_assert!(n * dt <= t * (1.0 + 1e-9));
                prop_assert!((n + 1.0) * dt > t * (1.0 - 1e-9));
            }

            #[test]
            fn step_bound_is_exact(n in 1u64..200) {
                let mut sim = Simulator::builder(heated(3, 4, 300.0), 1e9, RunBound::MaxSteps(n))
                    .build()
                    .unwrap();
                let result = sim.run().unwrap();
                prop_assert!(!result.is_reached());
                prop_assert_eq!(sim.metrics().steps, n);
                prop_assert_eq!(result.series().len() as u64, n + 1);
            }
        }
    }
}
