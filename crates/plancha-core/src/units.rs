//! Unit-tagged physical quantities.
//!
//! A [`Quantity`] stores its magnitude in canonical SI units (m, kg, s, K)
//! together with a [`Dimension`] tag. Conversion to and from user-facing
//! [`Unit`]s happens only at the input/output boundary; the solver works
//! on bare `f64` magnitudes after validation.

use std::fmt;
use std::ops::{Div, Mul};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::KELVIN_OFFSET;

/// Integer exponents over the base dimensions used by the simulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    /// Length exponent.
    pub length: i8,
    /// Mass exponent.
    pub mass: i8,
    /// Time exponent.
    pub time: i8,
    /// Temperature exponent.
    pub temperature: i8,
}

impl Dimension {
    /// Pure number.
    pub const DIMENSIONLESS: Self = Self::new(0, 0, 0, 0);
    /// m
    pub const LENGTH: Self = Self::new(1, 0, 0, 0);
    /// s
    pub const TIME: Self = Self::new(0, 0, 1, 0);
    /// K
    pub const TEMPERATURE: Self = Self::new(0, 0, 0, 1);
    /// W/m² = kg·s⁻³
    pub const HEAT_FLUX: Self = Self::new(0, 1, -3, 0);
    /// W/(m²·K)
    pub const HEAT_TRANSFER_COEFFICIENT: Self = Self::new(0, 1, -3, -1);
    /// W/(m·K)
    pub const CONDUCTIVITY: Self = Self::new(1, 1, -3, -1);
    /// kg/m³
    pub const DENSITY: Self = Self::new(-3, 1, 0, 0);
    /// J/(kg·K) = m²·s⁻²·K⁻¹
    pub const SPECIFIC_HEAT: Self = Self::new(2, 0, -2, -1);
    /// m²/s
    pub const DIFFUSIVITY: Self = Self::new(2, 0, -1, 0);
    /// J/m = kg·m·s⁻²
    pub const ENERGY_PER_LENGTH: Self = Self::new(1, 1, -2, 0);
    /// W/m = kg·m·s⁻³
    pub const POWER_PER_LENGTH: Self = Self::new(1, 1, -3, 0);

    /// Build a dimension from its exponents.
    pub const fn new(length: i8, mass: i8, time: i8, temperature: i8) -> Self {
        Self {
            length,
            mass,
            time,
            temperature,
        }
    }

    /// Dimension of a product.
    pub const fn mul(self, other: Self) -> Self {
        Self::new(
            self.length + other.length,
            self.mass + other.mass,
            self.time + other.time,
            self.temperature + other.temperature,
        )
    }

    /// Dimension of a quotient.
    pub const fn div(self, other: Self) -> Self {
        Self::new(
            self.length - other.length,
            self.mass - other.mass,
            self.time - other.time,
            self.temperature - other.temperature,
        )
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            ("m", self.length),
            ("kg", self.mass),
            ("s", self.time),
            ("K", self.temperature),
        ];
        let mut wrote = false;
        for (symbol, exp) in parts {
            if exp == 0 {
                continue;
            }
            if wrote {
                write!(f, " ")?;
            }
            if exp == 1 {
                write!(f, "{symbol}")?;
            } else {
                write!(f, "{symbol}^{exp}")?;
            }
            wrote = true;
        }
        if !wrote {
            write!(f, "1")?;
        }
        Ok(())
    }
}

/// Units accepted at the input boundary and offered at the output boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Pure number.
    #[serde(rename = "1")]
    Dimensionless,
    /// Metre.
    #[serde(rename = "m")]
    Metre,
    /// Centimetre.
    #[serde(rename = "cm")]
    Centimetre,
    /// Millimetre.
    #[serde(rename = "mm")]
    Millimetre,
    /// Second.
    #[serde(rename = "s")]
    Second,
    /// Minute.
    #[serde(rename = "min")]
    Minute,
    /// Kelvin (absolute).
    #[serde(rename = "K")]
    Kelvin,
    /// Degree Celsius (absolute; offset applied).
    #[serde(rename = "degC")]
    Celsius,
    /// W/m².
    #[serde(rename = "W/m^2")]
    WattPerSquareMetre,
    /// W/(m²·K).
    #[serde(rename = "W/(m^2*K)")]
    WattPerSquareMetreKelvin,
    /// W/(m·K).
    #[serde(rename = "W/(m*K)")]
    WattPerMetreKelvin,
    /// kg/m³.
    #[serde(rename = "kg/m^3")]
    KilogramPerCubicMetre,
    /// J/(kg·K).
    #[serde(rename = "J/(kg*K)")]
    JoulePerKilogramKelvin,
    /// m²/s.
    #[serde(rename = "m^2/s")]
    SquareMetrePerSecond,
    /// J/m.
    #[serde(rename = "J/m")]
    JoulePerMetre,
    /// W/m.
    #[serde(rename = "W/m")]
    WattPerMetre,
}

impl Unit {
    /// Physical dimension of this unit.
    pub const fn dimension(self) -> Dimension {
        match self {
            Self::Dimensionless => Dimension::DIMENSIONLESS,
            Self::Metre | Self::Centimetre | Self::Millimetre => Dimension::LENGTH,
            Self::Second | Self::Minute => Dimension::TIME,
            Self::Kelvin | Self::Celsius => Dimension::TEMPERATURE,
            Self::WattPerSquareMetre => Dimension::HEAT_FLUX,
            Self::WattPerSquareMetreKelvin => Dimension::HEAT_TRANSFER_COEFFICIENT,
            Self::WattPerMetreKelvin => Dimension::CONDUCTIVITY,
            Self::KilogramPerCubicMetre => Dimension::DENSITY,
            Self::JoulePerKilogramKelvin => Dimension::SPECIFIC_HEAT,
            Self::SquareMetrePerSecond => Dimension::DIFFUSIVITY,
            Self::JoulePerMetre => Dimension::ENERGY_PER_LENGTH,
            Self::WattPerMetre => Dimension::POWER_PER_LENGTH,
        }
    }

    /// Multiplier from this unit to the canonical SI unit.
    const fn scale(self) -> f64 {
        match self {
            Self::Centimetre => 1e-2,
            Self::Millimetre => 1e-3,
            Self::Minute => 60.0,
            _ => 1.0,
        }
    }

    /// Additive offset applied after scaling (absolute temperatures only).
    const fn offset(self) -> f64 {
        match self {
            Self::Celsius => KELVIN_OFFSET,
            _ => 0.0,
        }
    }

    /// Printable symbol.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Dimensionless => "",
            Self::Metre => "m",
            Self::Centimetre => "cm",
            Self::Millimetre => "mm",
            Self::Second => "s",
            Self::Minute => "min",
            Self::Kelvin => "K",
            Self::Celsius => "°C",
            Self::WattPerSquareMetre => "W/m²",
            Self::WattPerSquareMetreKelvin => "W/(m²·K)",
            Self::WattPerMetreKelvin => "W/(m·K)",
            Self::KilogramPerCubicMetre => "kg/m³",
            Self::JoulePerKilogramKelvin => "J/(kg·K)",
            Self::SquareMetrePerSecond => "m²/s",
            Self::JoulePerMetre => "J/m",
            Self::WattPerMetre => "W/m",
        }
    }
}

/// A physical quantity: canonical SI magnitude plus dimension tag.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    magnitude: f64,
    dim: Dimension,
}

impl Quantity {
    /// Convert `value` expressed in `unit` to a canonical quantity.
    ///
    /// ```
    /// use plancha_core::{Quantity, Unit, Dimension};
    ///
    /// let width = Quantity::new(45.0, Unit::Centimetre);
    /// assert!((width.magnitude() - 0.45).abs() < 1e-12);
    /// assert_eq!(width.dimension(), Dimension::LENGTH);
    /// ```
    pub fn new(value: f64, unit: Unit) -> Self {
        Self {
            magnitude: value * unit.scale() + unit.offset(),
            dim: unit.dimension(),
        }
    }

    /// Wrap a magnitude that is already in canonical SI units.
    pub const fn from_canonical(magnitude: f64, dim: Dimension) -> Self {
        Self { magnitude, dim }
    }

    /// Canonical SI magnitude.
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Dimension tag.
    pub fn dimension(&self) -> Dimension {
        self.dim
    }

    /// Express this quantity in `unit`.
    ///
    /// Fails with [`ConfigError::DimensionMismatch`] if `unit` measures a
    /// different dimension.
    pub fn value_in(&self, unit: Unit) -> Result<f64, ConfigError> {
        if unit.dimension() != self.dim {
            return Err(ConfigError::DimensionMismatch {
                name: "quantity",
                expected: unit.dimension(),
                found: self.dim,
            });
        }
        Ok((self.magnitude - unit.offset()) / unit.scale())
    }

    /// Extract the canonical magnitude of an input named `name`, checking
    /// that it has dimension `expected` and is finite.
    pub fn canonical(&self, name: &'static str, expected: Dimension) -> Result<f64, ConfigError> {
        if self.dim != expected {
            return Err(ConfigError::DimensionMismatch {
                name,
                expected,
                found: self.dim,
            });
        }
        crate::error::require_finite(name, self.magnitude)
    }

    /// Sum of two quantities of the same dimension.
    pub fn checked_add(self, other: Self) -> Result<Self, ConfigError> {
        if self.dim != other.dim {
            return Err(ConfigError::DimensionMismatch {
                name: "addend",
                expected: self.dim,
                found: other.dim,
            });
        }
        Ok(Self::from_canonical(self.magnitude + other.magnitude, self.dim))
    }

    /// Difference of two quantities of the same dimension.
    pub fn checked_sub(self, other: Self) -> Result<Self, ConfigError> {
        if self.dim != other.dim {
            return Err(ConfigError::DimensionMismatch {
                name: "subtrahend",
                expected: self.dim,
                found: other.dim,
            });
        }
        Ok(Self::from_canonical(self.magnitude - other.magnitude, self.dim))
    }
}

impl Mul for Quantity {
    type Output = Quantity;

    fn mul(self, rhs: Quantity) -> Quantity {
        Quantity::from_canonical(self.magnitude * rhs.magnitude, self.dim.mul(rhs.dim))
    }
}

impl Div for Quantity {
    type Output = Quantity;

    fn div(self, rhs: Quantity) -> Quantity {
        Quantity::from_canonical(self.magnitude / rhs.magnitude, self.dim.div(rhs.dim))
    }
}

impl Mul<f64> for Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Quantity {
        Quantity::from_canonical(self.magnitude * rhs, self.dim)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dim == Dimension::DIMENSIONLESS {
            write!(f, "{}", self.magnitude)
        } else {
            write!(f, "{} {}", self.magnitude, self.dim)
        }
    }
}

/// A value tagged with the unit it was written in.
///
/// This is the serialized form used by configuration files:
/// `{ "value": 27.0, "unit": "degC" }`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measured {
    /// Numeric value in `unit`.
    pub value: f64,
    /// Unit of `value`.
    pub unit: Unit,
}

impl Measured {
    /// Tag `value` with `unit`.
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Convert to a canonical [`Quantity`].
    pub fn to_quantity(self) -> Quantity {
        Quantity::new(self.value, self.unit)
    }

    /// Convert and check dimension in one step.
    pub fn canonical(self, name: &'static str, expected: Dimension) -> Result<f64, ConfigError> {
        self.to_quantity().canonical(name, expected)
    }
}

impl From<Measured> for Quantity {
    fn from(m: Measured) -> Self {
        m.to_quantity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn celsius_round_trips_through_kelvin() {
        let t = Quantity::new(250.0, Unit::Celsius);
        assert!((t.magnitude() - 523.15).abs() < 1e-12);
        assert!((t.value_in(Unit::Celsius).unwrap() - 250.0).abs() < 1e-12);
        assert!((t.value_in(Unit::Kelvin).unwrap() - 523.15).abs() < 1e-12);
    }

    #[test]
    fn value_in_rejects_wrong_dimension() {
        let width = Quantity::new(45.0, Unit::Centimetre);
        let err = width.value_in(Unit::Kelvin).unwrap_err();
        assert!(matches!(err, ConfigError::DimensionMismatch { .. }));
    }

    #[test]
    fn products_combine_dimensions() {
        let h = Quantity::new(15.0, Unit::WattPerSquareMetreKelvin);
        let dt = Quantity::new(10.0, Unit::Kelvin);
        let flux = h * dt;
        assert_eq!(flux.dimension(), Dimension::HEAT_FLUX);
        assert!((flux.value_in(Unit::WattPerSquareMetre).unwrap() - 150.0).abs() < 1e-12);

        let k = Quantity::new(237.0, Unit::WattPerMetreKelvin);
        let l = Quantity::new(1.0, Unit::Centimetre);
        let biot = h * l / k;
        assert_eq!(biot.dimension(), Dimension::DIMENSIONLESS);
    }

    #[test]
    fn diffusivity_dimension_from_material() {
        let k = Quantity::new(237.0, Unit::WattPerMetreKelvin);
        let rho = Quantity::new(2702.0, Unit::KilogramPerCubicMetre);
        let cp = Quantity::new(903.0, Unit::JoulePerKilogramKelvin);
        let alpha = k / (rho * cp);
        assert_eq!(alpha.dimension(), Dimension::DIFFUSIVITY);
    }

    #[test]
    fn checked_add_rejects_mixed_dimensions() {
        let a = Quantity::new(1.0, Unit::Metre);
        let b = Quantity::new(1.0, Unit::Second);
        assert!(a.checked_add(b).is_err());
        let c = a.checked_add(Quantity::new(50.0, Unit::Centimetre)).unwrap();
        assert!((c.magnitude() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn canonical_checks_dimension_and_finiteness() {
        let q = Quantity::new(4500.0, Unit::WattPerSquareMetre);
        assert_eq!(q.canonical("flux", Dimension::HEAT_FLUX), Ok(4500.0));
        assert!(q.canonical("flux", Dimension::LENGTH).is_err());
        let bad = Quantity::from_canonical(f64::INFINITY, Dimension::HEAT_FLUX);
        assert!(matches!(
            bad.canonical("flux", Dimension::HEAT_FLUX),
            Err(ConfigError::NonFinite { .. })
        ));
    }

    #[test]
    fn dimension_display() {
        assert_eq!(Dimension::HEAT_FLUX.to_string(), "kg s^-3");
        assert_eq!(Dimension::DIMENSIONLESS.to_string(), "1");
        assert_eq!(Dimension::LENGTH.to_string(), "m");
    }

    #[test]
    fn measured_deserializes_from_tagged_json() {
        let m: Measured = serde_json::from_str(r#"{ "value": 27.0, "unit": "degC" }"#).unwrap();
        assert_eq!(m, Measured::new(27.0, Unit::Celsius));
        let k = m.canonical("ambient", Dimension::TEMPERATURE).unwrap();
        assert!((k - 300.15).abs() < 1e-12);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn celsius_differences_ignore_offset(a in -200.0f64..2000.0, b in -200.0f64..2000.0) {
                let diff = Quantity::new(a, Unit::Celsius)
                    .checked_sub(Quantity::new(b, Unit::Celsius))
                    .unwrap();
                prop_assert!((diff.magnitude() - (a - b)).abs() < 1e-9);
            }

            #[test]
            fn product_then_quotient_restores_dimension(x in 1e-3f64..1e3, y in 1e-3f64..1e3) {
                let h = Quantity::new(x, Unit::WattPerSquareMetreKelvin);
                let l = Quantity::new(y, Unit::Millimetre);
                let back = h * l / l;
                prop_assert_eq!(back.dimension(), Dimension::HEAT_TRANSFER_COEFFICIENT);
                prop_assert!((back.magnitude() - x).abs() <= 1e-12 * x);
            }
        }
    }
}
