//! Scenario configuration, validation, and canonical resolution.
//!
//! [`ScenarioConfig`] is the serializable, unit-tagged description of one
//! run. [`validate()`](ScenarioConfig::validate) checks every input and
//! converts it to the bare-SI [`ResolvedScenario`] the simulator consumes.
//! Units are converted here and nowhere downstream.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use plancha_core::{
    require_positive, ConfigError, Dimension, MaterialProperties, MaterialTable, Measured, Unit,
};
use plancha_propagators::{
    FiniteDifferenceGrid, LumpedCapacitanceModel, StabilityAnalyzer, StabilityReport,
    SurfaceConditions,
};
use plancha_space::{GridSpec, SlabGrid};

use crate::simulator::RunBound;

// ── Geometry ───────────────────────────────────────────────────────

/// How the node spacing is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spacing {
    /// An explicit length; must divide both thickness and width.
    Explicit(Measured),
    /// Divide the thickness into this many parts.
    RowsThroughThickness(usize),
}

/// Slab cross-section.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Heated face to convective face.
    pub thickness: Measured,
    /// Side to side.
    pub width: Measured,
    /// Node spacing.
    pub spacing: Spacing,
}

// ── Material ───────────────────────────────────────────────────────

/// Which material the slab is made of.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialSpec {
    /// A named entry of the material table.
    Preset(String),
    /// Explicit SI properties.
    Properties(MaterialProperties),
}

impl MaterialSpec {
    /// Look up or validate the properties.
    pub fn resolve(&self, table: &MaterialTable) -> Result<MaterialProperties, ConfigError> {
        let props = match self {
            Self::Preset(name) => *table.get(name)?,
            Self::Properties(props) => *props,
        };
        props.validate()?;
        Ok(props)
    }
}

// ── Boundary ───────────────────────────────────────────────────────

/// Surface conditions in unit-tagged form.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConfig {
    /// Ambient air temperature.
    pub ambient: Measured,
    /// Convective heat-transfer coefficient.
    pub convection_coefficient: Measured,
    /// Constant flux on the heated face.
    pub heat_flux: Measured,
}

// ── Time stepping ──────────────────────────────────────────────────

/// How the time step is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeStep {
    /// `safety · dt_max` from the stability analysis. `safety` in `(0, 1]`.
    Stable {
        /// Fraction of the largest stable step.
        safety: f64,
    },
    /// A caller-chosen step. Accepted above `dt_max` with a warning.
    Fixed(Measured),
}

/// When to give up if the threshold is never crossed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunLimit {
    /// At most this many steps.
    MaxSteps(u64),
    /// At most this much simulated time.
    MaxTime(Measured),
}

fn default_record_every() -> u64 {
    1
}

// ── ScenarioConfig ─────────────────────────────────────────────────

/// Everything needed to run one plancha scenario.
///
/// Serializes to JSON with every dimensional input as
/// `{ "value": .., "unit": ".." }`.
///
/// ```
/// use plancha_engine::ScenarioConfig;
///
/// let config = ScenarioConfig::default();
/// let scenario = config.validate().unwrap();
/// assert_eq!((scenario.grid.rows(), scenario.grid.cols()), (3, 135));
/// assert!(scenario.dt > 0.028 && scenario.dt < 0.029);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Slab cross-section and spacing.
    pub geometry: GeometryConfig,
    /// Slab material.
    pub material: MaterialSpec,
    /// Surface conditions.
    pub boundary: BoundaryConfig,
    /// Uniform temperature at time zero.
    pub initial_temperature: Measured,
    /// Temperature the monitored node must reach.
    pub threshold: Measured,
    /// Time-step selection.
    pub time_step: TimeStep,
    /// Run bound.
    pub limit: RunLimit,
    /// Monitored node `(row, col)`. Defaults to the top-face centre.
    #[serde(default)]
    pub monitor: Option<(usize, usize)>,
    /// Record the monitored temperature every this many steps.
    #[serde(default = "default_record_every")]
    pub record_every: u64,
    /// Simulated times at which to capture the whole field.
    #[serde(default)]
    pub capture_at: Vec<Measured>,
}

impl Default for ScenarioConfig {
    /// The aluminum plancha: 1 cm x 45 cm, 4.5 kW/m² burner, still air at
    /// 27 °C, heating from 305 K to 250 °C.
    fn default() -> Self {
        Self {
            geometry: GeometryConfig {
                thickness: Measured::new(1.0, Unit::Centimetre),
                width: Measured::new(45.0, Unit::Centimetre),
                spacing: Spacing::RowsThroughThickness(3),
            },
            material: MaterialSpec::Preset("aluminum".to_string()),
            boundary: BoundaryConfig {
                ambient: Measured::new(27.0, Unit::Celsius),
                convection_coefficient: Measured::new(15.0, Unit::WattPerSquareMetreKelvin),
                heat_flux: Measured::new(4500.0, Unit::WattPerSquareMetre),
            },
            initial_temperature: Measured::new(305.0, Unit::Kelvin),
            threshold: Measured::new(250.0, Unit::Celsius),
            time_step: TimeStep::Stable { safety: 1.0 },
            limit: RunLimit::MaxTime(Measured::new(60.0, Unit::Minute)),
            monitor: None,
            record_every: 1,
            capture_at: Vec::new(),
        }
    }
}

impl ScenarioConfig {
    /// Parse a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })
    }

    /// Validate against the standard material table.
    pub fn validate(&self) -> Result<ResolvedScenario, ConfigError> {
        self.validate_with(&MaterialTable::standard())
    }

    /// Validate, resolving presets from `materials`.
    pub fn validate_with(&self, materials: &MaterialTable) -> Result<ResolvedScenario, ConfigError> {
        // 1. Geometry.
        let thickness = require_positive(
            "thickness",
            self.geometry
                .thickness
                .canonical("thickness", Dimension::LENGTH)?,
        )?;
        let width = require_positive(
            "width",
            self.geometry.width.canonical("width", Dimension::LENGTH)?,
        )?;
        let spec = match self.geometry.spacing {
            Spacing::Explicit(spacing) => GridSpec::new(
                thickness,
                width,
                spacing.canonical("spacing", Dimension::LENGTH)?,
            ),
            Spacing::RowsThroughThickness(rows) => {
                if rows < SlabGrid::MIN_DIM {
                    return Err(ConfigError::GridTooSmall { rows, cols: 0 });
                }
                GridSpec::with_rows(thickness, width, rows)
            }
        };
        let grid = spec.resolve()?;

        // 2. Material and surfaces.
        let material = self.material.resolve(materials)?;
        let surface = SurfaceConditions::new(
            self.boundary
                .ambient
                .canonical("ambient", Dimension::TEMPERATURE)?,
            self.boundary
                .convection_coefficient
                .canonical("convection_coefficient", Dimension::HEAT_TRANSFER_COEFFICIENT)?,
            self.boundary
                .heat_flux
                .canonical("heat_flux", Dimension::HEAT_FLUX)?,
        )?;
        let initial_temperature = self
            .initial_temperature
            .canonical("initial_temperature", Dimension::TEMPERATURE)?;
        let threshold = self
            .threshold
            .canonical("threshold", Dimension::TEMPERATURE)?;

        // 3. Stability and time step.
        let stability = StabilityAnalyzer::new(
            material,
            surface.convection_coefficient,
            thickness,
            grid.spacing(),
        )?
        .analyze();
        let dt = match self.time_step {
            TimeStep::Stable { safety } => {
                if !(safety > 0.0 && safety <= 1.0) {
                    return Err(ConfigError::InvalidSafetyFactor { value: safety });
                }
                safety * stability.dt_max
            }
            TimeStep::Fixed(dt) => {
                let dt = require_positive("dt", dt.canonical("dt", Dimension::TIME)?)?;
                if !stability.admits_dt(dt) {
                    warn!(
                        "fixed dt {dt} s exceeds the stable limit {} s; the field may oscillate",
                        stability.dt_max
                    );
                }
                dt
            }
        };

        // 4. Run bound and recording.
        let bound = match self.limit {
            RunLimit::MaxSteps(0) => {
                return Err(ConfigError::InvalidRunBound {
                    reason: "max_steps must be at least 1".to_string(),
                })
            }
            RunLimit::MaxSteps(n) => RunBound::MaxSteps(n),
            RunLimit::MaxTime(t) => {
                let t = require_positive("max_time", t.canonical("max_time", Dimension::TIME)?)?;
                if t < dt {
                    return Err(ConfigError::InvalidRunBound {
                        reason: format!("max_time {t} s is shorter than one step of {dt} s"),
                    });
                }
                RunBound::MaxTime(t)
            }
        };
        let monitor = self.monitor.unwrap_or_else(|| grid.top_centre());
        grid.checked_index(monitor.0, monitor.1)?;
        if self.record_every == 0 {
            return Err(ConfigError::NonPositive {
                name: "record_every",
                value: 0.0,
            });
        }
        let mut capture_at = self
            .capture_at
            .iter()
            .map(|m| {
                let t = m.canonical("capture_at", Dimension::TIME)?;
                if t < 0.0 {
                    return Err(ConfigError::Negative {
                        name: "capture_at",
                        value: t,
                    });
                }
                Ok(t)
            })
            .collect::<Result<Vec<_>, _>>()?;
        capture_at.sort_by(f64::total_cmp);

        debug!(
            "resolved scenario: {}x{} grid, dx={} m, dt={} s (limit {} s), Bi_slab={:.3e}",
            grid.rows(),
            grid.cols(),
            grid.spacing(),
            dt,
            stability.dt_max,
            stability.biot_slab
        );

        Ok(ResolvedScenario {
            grid,
            material,
            surface,
            thickness,
            width,
            initial_temperature,
            threshold,
            dt,
            stability,
            bound,
            monitor,
            record_every: self.record_every,
            capture_at,
        })
    }
}

// ── ResolvedScenario ───────────────────────────────────────────────

/// A validated scenario in canonical SI units.
#[derive(Clone, Debug)]
pub struct ResolvedScenario {
    /// Resolved grid.
    pub grid: SlabGrid,
    /// Slab material.
    pub material: MaterialProperties,
    /// Surface conditions.
    pub surface: SurfaceConditions,
    /// Slab thickness, m.
    pub thickness: f64,
    /// Slab width, m.
    pub width: f64,
    /// Uniform initial temperature, K.
    pub initial_temperature: f64,
    /// Threshold temperature, K.
    pub threshold: f64,
    /// Time step marched with, s.
    pub dt: f64,
    /// Stability analysis for this geometry, material and `h`.
    pub stability: StabilityReport,
    /// Run bound.
    pub bound: RunBound,
    /// Monitored node `(row, col)`.
    pub monitor: (usize, usize),
    /// Series recording interval in steps.
    pub record_every: u64,
    /// Field capture times, ascending, s.
    pub capture_at: Vec<f64>,
}

impl ResolvedScenario {
    /// A fresh finite-difference grid at the initial temperature.
    pub fn build_grid(&self) -> Result<FiniteDifferenceGrid, ConfigError> {
        FiniteDifferenceGrid::new(
            self.grid.clone(),
            self.material,
            self.surface,
            self.dt,
            self.initial_temperature,
        )
    }

    /// The lumped model of the same slab.
    pub fn lumped_model(&self) -> Result<LumpedCapacitanceModel, ConfigError> {
        LumpedCapacitanceModel::new(
            self.material,
            self.thickness,
            self.width,
            self.surface,
            self.initial_temperature,
        )
    }

    /// The same scenario with a different convective coefficient.
    ///
    /// The stability analysis is redone; the time step is kept, so a
    /// smaller `h` (looser bounds) stays stable.
    pub fn with_convection(&self, convection_coefficient: f64) -> Result<Self, ConfigError> {
        let surface = self.surface.with_convection(convection_coefficient);
        surface.validate()?;
        let stability = StabilityAnalyzer::new(
            self.material,
            convection_coefficient,
            self.thickness,
            self.grid.spacing(),
        )?
        .analyze();
        if !stability.admits_dt(self.dt) {
            warn!(
                "dt {} s exceeds the stable limit {} s at h = {convection_coefficient}",
                self.dt, stability.dt_max
            );
        }
        Ok(Self {
            surface,
            stability,
            ..self.clone()
        })
    }
}
