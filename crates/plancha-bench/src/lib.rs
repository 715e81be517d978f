//! Benchmark profiles for the Plancha simulator.
//!
//! Provides pre-built [`ScenarioConfig`] profiles for benchmarking:
//!
//! - [`reference_profile`]: the aluminum plancha at 3 x 135 nodes
//! - [`stress_profile`]: the same slab at 0.25 mm spacing (40 x 1800 nodes)
//! - [`profile_grid`]: a ready-to-step grid for any profile

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use plancha_core::{ConfigError, Measured, Unit};
use plancha_engine::{RunLimit, ScenarioConfig, Spacing};
use plancha_propagators::FiniteDifferenceGrid;

/// The aluminum plancha, bounded to `steps` steps.
///
/// 3 x 135 nodes, dx = 3.33 mm, dt ≈ 0.029 s.
pub fn reference_profile(steps: u64) -> ScenarioConfig {
    ScenarioConfig {
        limit: RunLimit::MaxSteps(steps),
        record_every: steps.max(1),
        ..ScenarioConfig::default()
    }
}

/// The aluminum plancha on a fine grid, bounded to `steps` steps.
///
/// 0.25 mm spacing gives 40 x 1800 nodes (72K), with a time step about
/// 180 times smaller than [`reference_profile`].
pub fn stress_profile(steps: u64) -> ScenarioConfig {
    let mut config = reference_profile(steps);
    config.geometry.spacing = Spacing::Explicit(Measured::new(0.25, Unit::Millimetre));
    config
}

/// A fresh grid at the profile's initial temperature.
pub fn profile_grid(config: &ScenarioConfig) -> Result<FiniteDifferenceGrid, ConfigError> {
    config.validate()?.build_grid()
}
