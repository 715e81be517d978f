//! Explicit-scheme stability analysis.
//!
//! Every node's update is a weighted average of old temperatures only
//! while its self coefficient stays non-negative. That gives one upper
//! bound on the Fourier number per structurally distinct node shape:
//!
//! ```text
//! interior             1 - 4Fo          >= 0   Fo <= 1/4
//! flux-heated edge     1 - 4Fo          >= 0   Fo <= 1/4
//! convective edge      1 - 4Fo - 2BiFo  >= 0   Fo <= 1/(2(2 + Bi))
//! flux corner          1 - 4Fo - 2BiFo  >= 0   Fo <= 1/(2(2 + Bi))
//! convective corner    1 - 4Fo - 4BiFo  >= 0   Fo <= 1/(4(1 + Bi))
//! ```
//!
//! `Bi` here is the node Biot number `h·dx/k`, the one the boundary
//! stencils actually use.

use plancha_core::{
    biot, fourier, require_non_negative, require_positive, ConfigError, MaterialProperties,
};

/// Relative slack when checking a Fourier number recomputed from `dt_max`.
const ADMIT_TOLERANCE: f64 = 1e-12;

/// The five per-category upper bounds on the Fourier number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FourierBounds {
    /// Interior nodes.
    pub interior: f64,
    /// Flux-heated edge nodes (row 0, no convection).
    pub flux_edge: f64,
    /// Nodes with a single convective face (top and sides).
    pub convective_edge: f64,
    /// Flux-heated corners with one convective half-face.
    pub flux_corner: f64,
    /// Corners with two convective faces.
    pub convective_corner: f64,
}

impl FourierBounds {
    /// Evaluate every bound at node Biot number `bi`.
    pub fn at_biot(bi: f64) -> Self {
        Self {
            interior: 0.25,
            flux_edge: 0.25,
            convective_edge: 1.0 / (2.0 * (2.0 + bi)),
            flux_corner: 1.0 / (2.0 * (2.0 + bi)),
            convective_corner: 1.0 / (4.0 * (1.0 + bi)),
        }
    }

    /// The bounds as an array, in declaration order.
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.interior,
            self.flux_edge,
            self.convective_edge,
            self.flux_corner,
            self.convective_corner,
        ]
    }

    /// The tightest bound.
    pub fn min(&self) -> f64 {
        self.as_array().into_iter().fold(f64::INFINITY, f64::min)
    }
}

/// Everything the analyzer derived for one set of inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StabilityReport {
    /// Slab Biot number `h·thickness/k`.
    pub biot_slab: f64,
    /// Node Biot number `h·dx/k`.
    pub biot_node: f64,
    /// Thermal diffusivity, m²/s.
    pub diffusivity: f64,
    /// Node spacing the bounds were evaluated for, m.
    pub spacing: f64,
    /// Per-category Fourier bounds.
    pub bounds: FourierBounds,
    /// `bounds.min()`.
    pub fourier_max: f64,
    /// Largest stable time step `fourier_max·dx²/alpha`, s.
    pub dt_max: f64,
}

impl StabilityReport {
    /// Whether `fourier` satisfies every bound.
    ///
    /// A Fourier number recomputed from `dt_max` may land one rounding
    /// step above `fourier_max`; that is admitted.
    pub fn admits(&self, fourier: f64) -> bool {
        fourier.is_finite()
            && fourier > 0.0
            && self
                .bounds
                .as_array()
                .into_iter()
                .all(|bound| fourier <= bound * (1.0 + ADMIT_TOLERANCE))
    }

    /// Whether the time step `dt` is stable at this report's spacing.
    pub fn admits_dt(&self, dt: f64) -> bool {
        self.admits(fourier(self.diffusivity, dt, self.spacing))
    }
}

/// Computes the largest stable explicit time step for a slab.
#[derive(Clone, Copy, Debug)]
pub struct StabilityAnalyzer {
    material: MaterialProperties,
    convection_coefficient: f64,
    thickness: f64,
    spacing: f64,
}

impl StabilityAnalyzer {
    /// Validate the inputs.
    ///
    /// Fails if any material property, the thickness or the spacing is not
    /// strictly positive, or if `h` is negative.
    pub fn new(
        material: MaterialProperties,
        convection_coefficient: f64,
        thickness: f64,
        spacing: f64,
    ) -> Result<Self, ConfigError> {
        material.validate()?;
        let convection_coefficient =
            require_non_negative("convection_coefficient", convection_coefficient)?;
        let thickness = require_positive("thickness", thickness)?;
        let spacing = require_positive("spacing", spacing)?;
        Ok(Self {
            material,
            convection_coefficient,
            thickness,
            spacing,
        })
    }

    /// Evaluate the bounds and the resulting time step.
    pub fn analyze(&self) -> StabilityReport {
        let k = self.material.conductivity;
        let alpha = self.material.diffusivity();
        let biot_node = biot(self.convection_coefficient, k, self.spacing);
        let bounds = FourierBounds::at_biot(biot_node);
        let fourier_max = bounds.min();
        StabilityReport {
            biot_slab: biot(self.convection_coefficient, k, self.thickness),
            biot_node,
            diffusivity: alpha,
            spacing: self.spacing,
            bounds,
            fourier_max,
            dt_max: fourier_max * self.spacing * self.spacing / alpha,
        }
    }

    /// Shorthand for `analyze().dt_max`.
    pub fn max_time_step(&self) -> f64 {
        self.analyze().dt_max
    }
}
