//! Double-buffered field storage for Plancha simulations.
//!
//! The explicit scheme reads every node of the previous time level while
//! writing the next one, so the two levels must never share memory.
//!
//! ```text
//! PingPongField
//! ├── buffer_a: Vec<f64>  ←─── staging (even generations) / published (odd)
//! └── buffer_b: Vec<f64>  ←─── published (even generations) / staging (odd)
//! ```
//!
//! A step borrows the published buffer read-only and the staging buffer
//! write-only through a [`StagingGuard`]; [`PingPongField::publish`] then
//! swaps roles by flipping an index. No reallocation happens after
//! construction.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod pingpong;

pub use pingpong::{PingPongField, StagingGuard};
