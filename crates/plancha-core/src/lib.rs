//! Core types and traits for the Plancha heat-conduction simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Plancha workspace:
//! unit-tagged quantities, material properties, the dimensionless
//! groups that govern the explicit scheme, and the error taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod groups;
pub mod material;
pub mod units;

pub use error::{
    require_finite, require_non_negative, require_positive, ConfigError, StepError, ThermalError,
    UnreachableTargetError,
};
pub use groups::{biot, fourier, StabilityParameters};
pub use material::{MaterialProperties, MaterialTable};
pub use units::{Dimension, Measured, Quantity, Unit};

/// Offset between the Celsius and Kelvin scales.
pub const KELVIN_OFFSET: f64 = 273.15;
