//! Numerical models for the Plancha slab.
//!
//! Three independent models share the material and boundary inputs:
//!
//! - [`StabilityAnalyzer`] derives the largest stable explicit time step
//!   from the five structurally distinct Fourier bounds.
//! - [`FiniteDifferenceGrid`] marches the 2D field with forward-time,
//!   centred-space control-volume stencils, one per node category.
//! - [`LumpedCapacitanceModel`] is the closed-form, spatially uniform
//!   reduced-order model used as a cross-check.
//!
//! # Step protocol
//!
//! ```text
//! step()   current ──stencils──▶ next      (next is written, current untouched)
//! commit() swap(current, next)             (fails if nothing was stepped)
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod boundary;
pub mod ftcs;
pub mod lumped;
pub mod snapshot;
pub mod stability;

pub use boundary::SurfaceConditions;
pub use ftcs::{FiniteDifferenceGrid, NodeStencil, StencilTable};
pub use lumped::{LumpedCapacitanceModel, LumpedSolution};
pub use snapshot::FieldSnapshot;
pub use stability::{FourierBounds, StabilityAnalyzer, StabilityReport};
