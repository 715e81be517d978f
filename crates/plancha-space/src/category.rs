//! Boundary-node categories.

use std::fmt;

/// Which side column a boundary node sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Column 0.
    Left,
    /// Column `cols - 1`.
    Right,
}

/// Coarse node kind by control-volume shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Quarter control volume.
    Corner,
    /// Half control volume.
    Edge,
    /// Full control volume.
    Interior,
}

/// The nine structurally distinct node categories of the slab grid.
///
/// Precedence is corner > edge > interior, so the categories are
/// disjoint even on the minimum 3x3 grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// Row 0 corner: surface flux on the bottom half-face, convection on
    /// one side half-face.
    FluxCorner(Side),
    /// Row 0, non-corner: surface flux, no convection.
    FluxEdge,
    /// Last-row corner: convection on the top and one side face.
    ConvectiveCorner(Side),
    /// Last row, non-corner: convection on the top face.
    ConvectiveTop,
    /// Side column, non-corner: convection on one side face.
    ConvectiveSide(Side),
    /// Pure conduction.
    Interior,
}

impl NodeCategory {
    /// Every category, in a fixed order.
    pub const ALL: [NodeCategory; 9] = [
        NodeCategory::FluxCorner(Side::Left),
        NodeCategory::FluxCorner(Side::Right),
        NodeCategory::FluxEdge,
        NodeCategory::ConvectiveCorner(Side::Left),
        NodeCategory::ConvectiveCorner(Side::Right),
        NodeCategory::ConvectiveTop,
        NodeCategory::ConvectiveSide(Side::Left),
        NodeCategory::ConvectiveSide(Side::Right),
        NodeCategory::Interior,
    ];

    /// Classify node `(row, col)` of a `rows x cols` grid.
    ///
    /// Assumes `rows >= 3`, `cols >= 3` and an in-bounds coordinate;
    /// [`SlabGrid`](crate::SlabGrid) guarantees both.
    pub fn classify(row: usize, col: usize, rows: usize, cols: usize) -> Self {
        let side = if col == 0 {
            Some(Side::Left)
        } else if col + 1 == cols {
            Some(Side::Right)
        } else {
            None
        };
        let bottom = row == 0;
        let top = row + 1 == rows;
        match (bottom, top, side) {
            (true, _, Some(s)) => Self::FluxCorner(s),
            (true, _, None) => Self::FluxEdge,
            (_, true, Some(s)) => Self::ConvectiveCorner(s),
            (_, true, None) => Self::ConvectiveTop,
            (false, false, Some(s)) => Self::ConvectiveSide(s),
            (false, false, None) => Self::Interior,
        }
    }

    /// Corner, edge, or interior.
    pub fn kind(self) -> NodeKind {
        match self {
            Self::FluxCorner(_) | Self::ConvectiveCorner(_) => NodeKind::Corner,
            Self::FluxEdge | Self::ConvectiveTop | Self::ConvectiveSide(_) => NodeKind::Edge,
            Self::Interior => NodeKind::Interior,
        }
    }

    /// Number of faces exchanging heat with ambient air.
    pub fn convective_faces(self) -> u8 {
        match self {
            Self::ConvectiveCorner(_) => 2,
            Self::FluxCorner(_) | Self::ConvectiveTop | Self::ConvectiveSide(_) => 1,
            Self::FluxEdge | Self::Interior => 0,
        }
    }

    /// Whether the node receives the surface flux.
    pub fn is_flux_heated(self) -> bool {
        matches!(self, Self::FluxCorner(_) | Self::FluxEdge)
    }

    /// Control-volume extent `(across the width, through the thickness)`
    /// as fractions of `dx`.
    pub fn extents(self) -> (f64, f64) {
        match self {
            Self::FluxCorner(_) | Self::ConvectiveCorner(_) => (0.5, 0.5),
            Self::FluxEdge | Self::ConvectiveTop => (1.0, 0.5),
            Self::ConvectiveSide(_) => (0.5, 1.0),
            Self::Interior => (1.0, 1.0),
        }
    }

    /// Total length of faces exposed to ambient air, as a fraction of `dx`.
    pub fn convective_length(self) -> f64 {
        match self {
            Self::FluxCorner(_) => 0.5,
            Self::ConvectiveCorner(_) | Self::ConvectiveTop | Self::ConvectiveSide(_) => 1.0,
            Self::FluxEdge | Self::Interior => 0.0,
        }
    }

    /// Length of face receiving the surface flux, as a fraction of `dx`.
    pub fn flux_length(self) -> f64 {
        match self {
            Self::FluxCorner(_) => 0.5,
            Self::FluxEdge => 1.0,
            _ => 0.0,
        }
    }

    /// Control-volume area as a fraction of `dx²`.
    pub fn volume_weight(self) -> f64 {
        let (ex, ey) = self.extents();
        ex * ey
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FluxCorner(Side::Left) => write!(f, "flux corner (left)"),
            Self::FluxCorner(Side::Right) => write!(f, "flux corner (right)"),
            Self::FluxEdge => write!(f, "flux edge"),
            Self::ConvectiveCorner(Side::Left) => write!(f, "convective corner (left)"),
            Self::ConvectiveCorner(Side::Right) => write!(f, "convective corner (right)"),
            Self::ConvectiveTop => write!(f, "convective top"),
            Self::ConvectiveSide(Side::Left) => write!(f, "convective side (left)"),
            Self::ConvectiveSide(Side::Right) => write!(f, "convective side (right)"),
            Self::Interior => write!(f, "interior"),
        }
    }
}
