//! Spatial structure for Plancha simulations.
//!
//! A slab cross-section is discretised into a structured grid of
//! `rows x cols` nodes with uniform spacing. Row 0 is the flux-heated
//! face, the last row is the convective face, and the first and last
//! columns are the convective sides. Every node falls into exactly one
//! of nine [`NodeCategory`] values; the classification is computed once
//! per geometry and cached on the [`SlabGrid`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod category;
pub mod grid;

pub use category::{NodeCategory, NodeKind, Side};
pub use grid::{Direction, GridSpec, Neighbours, SlabGrid};
