//! Error types for the Plancha simulator.
//!
//! Organised by failure kind so callers can branch on it: configuration
//! problems detected before a run starts, unreachable targets in the
//! lumped-capacitance solve, and misuse of the step/commit protocol.
//! Exhausting a run without crossing the threshold is *not* an error;
//! it is a result variant in `plancha-engine`.

use std::error::Error;
use std::fmt;

use crate::units::Dimension;

/// Errors detected while validating run inputs.
///
/// All configuration errors are fatal for the run they describe and are
/// never retried.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `thickness / spacing` or `width / spacing` is not an integer.
    NonIntegerGrid {
        /// Which axis failed (`"rows"` or `"cols"`).
        axis: &'static str,
        /// The ratio that should have been an integer.
        ratio: f64,
    },
    /// The grid has fewer than 3 nodes along an axis.
    GridTooSmall {
        /// Number of rows (through the thickness).
        rows: usize,
        /// Number of columns (across the width).
        cols: usize,
    },
    /// A quantity that must be strictly positive was zero or negative.
    NonPositive {
        /// Name of the offending input.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A quantity that must be non-negative was negative.
    Negative {
        /// Name of the offending input.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A quantity was NaN or infinite.
    NonFinite {
        /// Name of the offending input.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The lumped model was given both or neither of final temperature
    /// and elapsed time.
    LumpedQuery {
        /// `true` if both were supplied, `false` if neither was.
        both: bool,
    },
    /// A quantity carried the wrong physical dimension.
    DimensionMismatch {
        /// Name of the offending input.
        name: &'static str,
        /// The dimension the input must have.
        expected: Dimension,
        /// The dimension it actually had.
        found: Dimension,
    },
    /// A material preset name was not found in the material table.
    UnknownMaterial {
        /// The requested name.
        name: String,
    },
    /// The monitored node lies outside the grid.
    MonitorOutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Grid rows.
        rows: usize,
        /// Grid columns.
        cols: usize,
    },
    /// The stable time-step safety factor is outside `(0, 1]`.
    InvalidSafetyFactor {
        /// The rejected factor.
        value: f64,
    },
    /// The run bound cannot terminate or is degenerate.
    InvalidRunBound {
        /// Description of the problem.
        reason: String,
    },
    /// A serialized configuration could not be parsed.
    Parse {
        /// Parser message.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonIntegerGrid { axis, ratio } => {
                write!(f, "grid {axis} ratio {ratio} is not an integer")
            }
            Self::GridTooSmall { rows, cols } => {
                write!(f, "grid {rows}x{cols} is smaller than the 3x3 minimum")
            }
            Self::NonPositive { name, value } => {
                write!(f, "{name} must be positive, got {value}")
            }
            Self::Negative { name, value } => {
                write!(f, "{name} must be non-negative, got {value}")
            }
            Self::NonFinite { name, value } => {
                write!(f, "{name} must be finite, got {value}")
            }
            Self::LumpedQuery { both: true } => write!(
                f,
                "lumped model needs exactly one of final temperature or elapsed time, got both"
            ),
            Self::LumpedQuery { both: false } => write!(
                f,
                "lumped model needs exactly one of final temperature or elapsed time, got neither"
            ),
            Self::DimensionMismatch {
                name,
                expected,
                found,
            } => write!(f, "{name} has dimension [{found}], expected [{expected}]"),
            Self::UnknownMaterial { name } => write!(f, "unknown material '{name}'"),
            Self::MonitorOutOfBounds {
                row,
                col,
                rows,
                cols,
            } => write!(
                f,
                "monitored node ({row}, {col}) is outside the {rows}x{cols} grid"
            ),
            Self::InvalidSafetyFactor { value } => {
                write!(f, "time-step safety factor must be in (0, 1], got {value}")
            }
            Self::InvalidRunBound { reason } => write!(f, "invalid run bound: {reason}"),
            Self::Parse { reason } => write!(f, "config parse error: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// The requested final temperature cannot be reached by the lumped model.
///
/// Raised when the target lies at or beyond the steady-state temperature,
/// or on the far side of the initial temperature from it. Fatal for the
/// call that raised it only.
#[derive(Clone, Debug, PartialEq)]
pub struct UnreachableTargetError {
    /// Requested final temperature (K).
    pub target: f64,
    /// Initial temperature (K).
    pub initial: f64,
    /// Steady-state temperature the solution approaches (K).
    pub steady_state: f64,
}

impl fmt::Display for UnreachableTargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "target {} K is unreachable from {} K: solution approaches {} K",
            self.target, self.initial, self.steady_state
        )
    }
}

impl Error for UnreachableTargetError {}

/// Any failure a thermal calculation can report.
#[derive(Clone, Debug, PartialEq)]
pub enum ThermalError {
    /// Invalid inputs.
    Config(ConfigError),
    /// Lumped-model target beyond the steady state.
    UnreachableTarget(UnreachableTargetError),
    /// The step/commit protocol was violated while marching.
    Step(StepError),
}

impl fmt::Display for ThermalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration: {e}"),
            Self::UnreachableTarget(e) => write!(f, "unreachable target: {e}"),
            Self::Step(e) => write!(f, "step: {e}"),
        }
    }
}

impl Error for ThermalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::UnreachableTarget(e) => Some(e),
            Self::Step(e) => Some(e),
        }
    }
}

impl From<ConfigError> for ThermalError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<UnreachableTargetError> for ThermalError {
    fn from(e: UnreachableTargetError) -> Self {
        Self::UnreachableTarget(e)
    }
}

impl From<StepError> for ThermalError {
    fn from(e: StepError) -> Self {
        Self::Step(e)
    }
}

/// Misuse of the produce-then-commit step protocol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// `commit()` was called without a staged `step()`.
    NothingStaged,
    /// A field buffer had the wrong number of cells.
    LengthMismatch {
        /// Cells the grid expects.
        expected: usize,
        /// Cells supplied.
        got: usize,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NothingStaged => write!(f, "commit() called without a preceding step()"),
            Self::LengthMismatch { expected, got } => {
                write!(f, "field has {got} cells, expected {expected}")
            }
        }
    }
}

impl Error for StepError {}

/// Check that `value` is finite and strictly positive.
pub fn require_positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    let value = require_finite(name, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { name, value });
    }
    Ok(value)
}

/// Check that `value` is finite and not negative.
pub fn require_non_negative(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    let value = require_finite(name, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { name, value });
    }
    Ok(value)
}

/// Check that `value` is neither NaN nor infinite.
pub fn require_finite(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { name, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_and_nan() {
        assert_eq!(
            require_positive("spacing", 0.0),
            Err(ConfigError::NonPositive {
                name: "spacing",
                value: 0.0
            })
        );
        assert!(matches!(
            require_positive("spacing", f64::NAN),
            Err(ConfigError::NonFinite { .. })
        ));
        assert_eq!(require_positive("spacing", 0.5), Ok(0.5));
    }

    #[test]
    fn non_negative_accepts_zero() {
        assert_eq!(require_non_negative("h", 0.0), Ok(0.0));
        assert!(matches!(
            require_non_negative("h", -1.0),
            Err(ConfigError::Negative { name: "h", .. })
        ));
    }

    #[test]
    fn thermal_error_chains_source() {
        let err: ThermalError = UnreachableTargetError {
            target: 700.0,
            initial: 300.0,
            steady_state: 600.0,
        }
        .into();
        assert!(err.source().is_some());
        assert!(err.to_string().contains("700"));
    }

    #[test]
    fn lumped_query_messages_differ() {
        let both = ConfigError::LumpedQuery { both: true }.to_string();
        let neither = ConfigError::LumpedQuery { both: false }.to_string();
        assert!(both.ends_with("both"));
        assert!(neither.ends_with("neither"));
    }
}
