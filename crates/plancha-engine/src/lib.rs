//! Scenario orchestration for the Plancha heat-conduction simulator.
//!
//! - [`ScenarioConfig`] describes a run in unit-tagged values and
//!   validates into a canonical [`ResolvedScenario`].
//! - [`Simulator`] marches a [`FiniteDifferenceGrid`](plancha_propagators::FiniteDifferenceGrid)
//!   until the monitored node crosses a threshold or the run bound is spent.
//! - [`ScenarioReport`] gathers the scalar outputs of one scenario,
//!   cross-checked against the lumped model.
//! - [`run_sweep`] runs one scenario per material concurrently.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod metrics;
pub mod report;
pub mod series;
pub mod simulator;
pub mod sweep;

pub use config::{
    BoundaryConfig, GeometryConfig, MaterialSpec, ResolvedScenario, RunLimit, ScenarioConfig,
    Spacing, TimeStep,
};
pub use metrics::RunMetrics;
pub use report::{HalvedConvection, ScenarioReport};
pub use series::TimeSeries;
pub use simulator::{RunBound, SimulationResult, Simulator, SimulatorBuilder};
pub use sweep::run_sweep;
