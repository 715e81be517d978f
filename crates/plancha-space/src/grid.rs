//! Grid specification and the resolved slab grid.

use plancha_core::{require_positive, ConfigError};
use smallvec::SmallVec;

use crate::category::{NodeCategory, NodeKind};

/// Relative tolerance for accepting `length / spacing` as an integer.
const RATIO_TOLERANCE: f64 = 1e-9;

/// Direction from a node to one of its four lattice neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards the convective face (row + 1).
    Up,
    /// Towards the flux-heated face (row - 1).
    Down,
    /// Towards the left side (col - 1).
    Left,
    /// Towards the right side (col + 1).
    Right,
}

impl Direction {
    /// Whether this direction runs through the thickness.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// In-bounds neighbours of a node as `(direction, flat index)` pairs.
pub type Neighbours = SmallVec<[(Direction, usize); 4]>;

/// Physical description of the slab cross-section and its spacing, in metres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    /// Slab thickness (heated face to convective face).
    pub thickness: f64,
    /// Slab width (side to side).
    pub width: f64,
    /// Node spacing, identical in both directions.
    pub spacing: f64,
}

impl GridSpec {
    /// Describe a slab with an explicit spacing.
    pub fn new(thickness: f64, width: f64, spacing: f64) -> Self {
        Self {
            thickness,
            width,
            spacing,
        }
    }

    /// Describe a slab whose spacing divides the thickness into `rows` parts.
    pub fn with_rows(thickness: f64, width: f64, rows: usize) -> Self {
        Self::new(thickness, width, thickness / rows as f64)
    }

    /// Validate the description and build the grid.
    ///
    /// `rows = thickness / spacing` and `cols = width / spacing` must both
    /// be integers and at least 3.
    ///
    /// # Examples
    ///
    /// ```
    /// use plancha_space::GridSpec;
    ///
    /// let grid = GridSpec::with_rows(0.01, 0.45, 3).resolve().unwrap();
    /// assert_eq!((grid.rows(), grid.cols()), (3, 135));
    ///
    /// assert!(GridSpec::new(0.01, 0.45, 0.004).resolve().is_err());
    /// ```
    pub fn resolve(&self) -> Result<SlabGrid, ConfigError> {
        let thickness = require_positive("thickness", self.thickness)?;
        let width = require_positive("width", self.width)?;
        let spacing = require_positive("spacing", self.spacing)?;
        let rows = exact_ratio("rows", thickness, spacing)?;
        let cols = exact_ratio("cols", width, spacing)?;
        SlabGrid::new(rows, cols, spacing)
    }
}

fn exact_ratio(axis: &'static str, length: f64, spacing: f64) -> Result<usize, ConfigError> {
    let ratio = length / spacing;
    let nearest = ratio.round();
    if !ratio.is_finite() || (ratio - nearest).abs() > RATIO_TOLERANCE * nearest.max(1.0) {
        return Err(ConfigError::NonIntegerGrid { axis, ratio });
    }
    Ok(nearest as usize)
}

/// A resolved `rows x cols` slab grid with cached node categories.
///
/// Nodes are stored row-major: index `row * cols + col`.
#[derive(Clone, Debug)]
pub struct SlabGrid {
    rows: usize,
    cols: usize,
    spacing: f64,
    categories: Vec<NodeCategory>,
}

impl SlabGrid {
    /// Smallest dimension that keeps corner, edge and interior disjoint.
    pub const MIN_DIM: usize = 3;

    /// Build a grid directly from node counts.
    pub fn new(rows: usize, cols: usize, spacing: f64) -> Result<Self, ConfigError> {
        let spacing = require_positive("spacing", spacing)?;
        if rows < Self::MIN_DIM || cols < Self::MIN_DIM {
            return Err(ConfigError::GridTooSmall { rows, cols });
        }
        let mut categories = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                categories.push(NodeCategory::classify(r, c, rows, cols));
            }
        }
        Ok(Self {
            rows,
            cols,
            spacing,
            categories,
        })
    }

    /// Nodes through the thickness.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Nodes across the width.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Node spacing in metres.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Total node count.
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Flat index of `(row, col)`. Does not bounds-check.
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// `(row, col)` of a flat index.
    pub fn coord(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    /// Flat index of `(row, col)`, or an error if it lies outside the grid.
    pub fn checked_index(&self, row: usize, col: usize) -> Result<usize, ConfigError> {
        if row >= self.rows || col >= self.cols {
            return Err(ConfigError::MonitorOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.index(row, col))
    }

    /// Cached category of a node.
    pub fn category(&self, index: usize) -> NodeCategory {
        self.categories[index]
    }

    /// All cached categories in row-major order.
    pub fn categories(&self) -> &[NodeCategory] {
        &self.categories
    }

    /// Number of nodes of the given kind.
    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.categories.iter().filter(|c| c.kind() == kind).count()
    }

    /// Conventional monitoring point: centre of the convective face.
    pub fn top_centre(&self) -> (usize, usize) {
        (self.rows - 1, self.cols / 2)
    }

    /// In-bounds 4-connected neighbours of a node.
    pub fn neighbours(&self, index: usize) -> Neighbours {
        let (r, c) = self.coord(index);
        let mut out = Neighbours::new();
        if r + 1 < self.rows {
            out.push((Direction::Up, index + self.cols));
        }
        if r > 0 {
            out.push((Direction::Down, index - self.cols));
        }
        if c > 0 {
            out.push((Direction::Left, index - 1));
        }
        if c + 1 < self.cols {
            out.push((Direction::Right, index + 1));
        }
        out
    }
}
