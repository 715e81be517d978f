//! The reference aluminum plancha and small grids.

use plancha_core::{MaterialProperties, KELVIN_OFFSET};
use plancha_space::{GridSpec, SlabGrid};

/// Slab thickness, m.
pub const PLANCHA_THICKNESS: f64 = 0.01;
/// Slab width, m.
pub const PLANCHA_WIDTH: f64 = 0.45;
/// Convective coefficient of still kitchen air, W/(m²·K).
pub const PLANCHA_H: f64 = 15.0;
/// Burner flux on the heated face, W/m².
pub const PLANCHA_FLUX: f64 = 4500.0;
/// Ambient air, 27 °C in K.
pub const PLANCHA_AMBIENT: f64 = 27.0 + KELVIN_OFFSET;
/// Initial slab temperature, K.
pub const PLANCHA_INITIAL: f64 = 305.0;
/// Cooking temperature, 250 °C in K.
pub const PLANCHA_THRESHOLD: f64 = 250.0 + KELVIN_OFFSET;
/// Spacing used by [`small_grid`], m.
pub const SMALL_SPACING: f64 = 0.001;

/// Aluminum properties.
pub fn aluminum() -> MaterialProperties {
    MaterialProperties::aluminum()
}

/// The 3 x 135 plancha grid (spacing = thickness / 3).
pub fn plancha_grid() -> SlabGrid {
    GridSpec::with_rows(PLANCHA_THICKNESS, PLANCHA_WIDTH, 3)
        .resolve()
        .expect("plancha grid resolves")
}

/// A `rows x cols` grid at [`SMALL_SPACING`].
pub fn small_grid(rows: usize, cols: usize) -> SlabGrid {
    SlabGrid::new(rows, cols, SMALL_SPACING).expect("small grid is at least 3x3")
}
