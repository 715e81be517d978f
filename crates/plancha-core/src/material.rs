//! Material properties and the preset material table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{require_positive, ConfigError};

/// Thermophysical properties of a homogeneous solid, in SI units.
///
/// Immutable for the life of a run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Density, kg/m³.
    pub density: f64,
    /// Specific heat capacity, J/(kg·K).
    pub specific_heat: f64,
    /// Thermal conductivity, W/(m·K).
    pub conductivity: f64,
}

impl MaterialProperties {
    /// Create a validated property set.
    pub fn new(density: f64, specific_heat: f64, conductivity: f64) -> Result<Self, ConfigError> {
        let props = Self {
            density,
            specific_heat,
            conductivity,
        };
        props.validate()?;
        Ok(props)
    }

    /// Check that every property is finite and strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("density", self.density)?;
        require_positive("specific_heat", self.specific_heat)?;
        require_positive("conductivity", self.conductivity)?;
        Ok(())
    }

    /// Thermal diffusivity `k / (ρ·cp)`, m²/s.
    pub fn diffusivity(&self) -> f64 {
        self.conductivity / self.volumetric_heat_capacity()
    }

    /// Volumetric heat capacity `ρ·cp`, J/(m³·K).
    pub fn volumetric_heat_capacity(&self) -> f64 {
        self.density * self.specific_heat
    }

    /// Pure aluminum near 300 K.
    pub const fn aluminum() -> Self {
        Self {
            density: 2702.0,
            specific_heat: 903.0,
            conductivity: 237.0,
        }
    }

    /// Plain carbon steel near 300 K, standing in for cast iron.
    pub const fn plain_carbon_steel() -> Self {
        Self {
            density: 7854.0,
            specific_heat: 434.0,
            conductivity: 60.5,
        }
    }

    /// Fireclay brick near 478 K, the ceramic option.
    pub const fn fireclay_brick() -> Self {
        Self {
            density: 2645.0,
            specific_heat: 960.0,
            conductivity: 1.0,
        }
    }
}

/// Named materials in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialTable {
    entries: IndexMap<String, MaterialProperties>,
}

impl MaterialTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The three plancha materials: aluminum, cast iron, ceramic.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.insert("aluminum", MaterialProperties::aluminum());
        table.insert("cast_iron", MaterialProperties::plain_carbon_steel());
        table.insert("ceramic", MaterialProperties::fireclay_brick());
        table
    }

    /// Add or replace a material. Replacing keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, props: MaterialProperties) {
        self.entries.insert(name.into(), props);
    }

    /// Look up a material by name.
    pub fn get(&self, name: &str) -> Result<&MaterialProperties, ConfigError> {
        self.entries
            .get(name)
            .ok_or_else(|| ConfigError::UnknownMaterial {
                name: name.to_string(),
            })
    }

    /// Iterate `(name, properties)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MaterialProperties)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of materials.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no materials.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for (_, props) in MaterialTable::standard().iter() {
            props.validate().unwrap();
        }
    }

    #[test]
    fn aluminum_diffusivity() {
        let alpha = MaterialProperties::aluminum().diffusivity();
        assert!((alpha - 237.0 / (2702.0 * 903.0)).abs() < 1e-15);
        assert!(alpha > 9.0e-5 && alpha < 1.0e-4);
    }

    #[test]
    fn new_rejects_non_positive() {
        let err = MaterialProperties::new(2702.0, 0.0, 237.0).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NonPositive {
                name: "specific_heat",
                value: 0.0
            }
        );
        assert!(MaterialProperties::new(-1.0, 903.0, 237.0).is_err());
        assert!(MaterialProperties::new(2702.0, 903.0, f64::NAN).is_err());
    }

    #[test]
    fn table_preserves_order_and_reports_unknown() {
        let table = MaterialTable::standard();
        let names: Vec<&str> = table.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["aluminum", "cast_iron", "ceramic"]);
        assert!(matches!(
            table.get("granite"),
            Err(ConfigError::UnknownMaterial { .. })
        ));
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
    }

    #[test]
    fn replacing_keeps_position() {
        let mut table = MaterialTable::standard();
        table.insert("aluminum", MaterialProperties::fireclay_brick());
        let first = table.iter().next().unwrap();
        assert_eq!(first.0, "aluminum");
        assert_eq!(*first.1, MaterialProperties::fireclay_brick());
    }
}
