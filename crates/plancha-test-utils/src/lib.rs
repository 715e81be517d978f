//! Test fixtures and assertion helpers for Plancha development.
//!
//! Provides the reference aluminum plancha inputs as plain SI constants,
//! small grids for fast stencil tests, and tolerance-aware assertions.
//! Depends only on the leaf crates so any crate can use it as a
//! dev-dependency.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    aluminum, plancha_grid, small_grid, PLANCHA_AMBIENT, PLANCHA_FLUX, PLANCHA_H,
    PLANCHA_INITIAL, PLANCHA_THICKNESS, PLANCHA_THRESHOLD, PLANCHA_WIDTH, SMALL_SPACING,
};

/// Assert `actual` is within `tol` of `expected`, relative to the larger
/// magnitude once that exceeds one.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    let scale = actual.abs().max(expected.abs()).max(1.0);
    assert!(
        (actual - expected).abs() <= tol * scale,
        "expected {expected}, got {actual} (tolerance {tol})"
    );
}

/// Assert that `values[skip..]` never decreases by more than `slack`.
#[track_caller]
pub fn assert_non_decreasing(values: &[f64], skip: usize, slack: f64) {
    for (i, pair) in values.windows(2).enumerate().skip(skip) {
        assert!(
            pair[1] >= pair[0] - slack,
            "sequence decreased at {}: {} -> {}",
            i + 1,
            pair[0],
            pair[1]
        );
    }
}
