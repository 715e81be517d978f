//! Plancha: transient heat conduction in a flat griddle slab.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Plancha sub-crates. For most users, adding `plancha` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use plancha::prelude::*;
//!
//! // The aluminum plancha: 1 cm x 45 cm, 4.5 kW/m² from below, 27 °C air.
//! let mut config = ScenarioConfig::default();
//! config.limit = RunLimit::MaxSteps(500);
//! let scenario = config.validate().unwrap();
//! assert!(scenario.stability.admits_dt(scenario.dt));
//!
//! let mut sim = Simulator::from_scenario(&scenario).unwrap();
//! let result = sim.run().unwrap();
//! assert!(!result.is_reached());
//! assert_eq!(sim.metrics().steps, 500);
//!
//! // The lumped model of the same slab.
//! let lumped = scenario.lumped_model().unwrap();
//! assert!(lumped.is_valid());
//! let t = lumped.solve_for_time(scenario.threshold).unwrap();
//! assert!(t > 2000.0 && t < 2300.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `plancha-core` | Units, materials, dimensionless groups, errors |
//! | [`space`] | `plancha-space` | Slab grid and node categories |
//! | [`arena`] | `plancha-arena` | Double-buffered temperature storage |
//! | [`propagators`] | `plancha-propagators` | FTCS stencils, stability, lumped model |
//! | [`engine`] | `plancha-engine` | Scenario config, simulator, reports, sweeps |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Units, materials, dimensionless groups, and errors (`plancha-core`).
///
/// Dimensional inputs are [`types::Measured`] values converted to SI once,
/// at validation.
pub use plancha_core as types;

/// Slab grid and node categories (`plancha-space`).
///
/// [`space::SlabGrid`] classifies every node into one of the nine
/// [`space::NodeCategory`] variants.
pub use plancha_space as space;

/// Double-buffered temperature storage (`plancha-arena`).
pub use plancha_arena as arena;

/// Explicit stencils, stability analysis, and the lumped model
/// (`plancha-propagators`).
pub use plancha_propagators as propagators;

/// Scenario configuration and the time-marching simulator (`plancha-engine`).
///
/// [`engine::ScenarioConfig`] validates into an [`engine::ResolvedScenario`];
/// [`engine::Simulator`] marches it to a threshold.
pub use plancha_engine as engine;

/// Common imports for typical Plancha usage.
///
/// ```rust
/// use plancha::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use plancha_core::{MaterialProperties, MaterialTable, Measured, Quantity, Unit};

    // Errors
    pub use plancha_core::{ConfigError, StepError, ThermalError, UnreachableTargetError};

    // Space
    pub use plancha_space::{NodeCategory, SlabGrid};

    // Propagators
    pub use plancha_propagators::{
        FieldSnapshot, FiniteDifferenceGrid, LumpedCapacitanceModel, StabilityAnalyzer,
        SurfaceConditions,
    };

    // Engine
    pub use plancha_engine::{
        run_sweep, RunLimit, ScenarioConfig, ScenarioReport, SimulationResult, Simulator,
    };
}
