//! # Prototype Registry — Data-Driven Building Archetypes
//!
//! Resolves a `(template, building type)` pair to the prototype inputs that
//! describe the reference building for that code edition. Every pair is a
//! row in the `prototype_inputs` table; there is no per-pair code.
//!
//! ## Design
//!
//! A `PrototypeConfig` is plain data. Resolution fails hard with
//! [`StandardsError::PrototypeNotFound`] when the table has no row, because
//! nothing downstream can proceed without prototype inputs.
//!
//! The registry also answers the two other prototype-keyed questions the
//! rules ask: stored per-end-use results (for target EUI) and whether a
//! standards space type is residential.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use prm_core::Template;

use crate::data::{SearchCriteria, StandardsData};
use crate::error::{StandardsError, StandardsResult};

pub const PROTOTYPE_INPUTS: &str = "prototype_inputs";
pub const PROTOTYPE_RESULTS: &str = "prototype_results";
pub const SPACE_TYPES: &str = "space_types";

// ─── Building types ─────────────────────────────────────────────────────────

/// The DOE commercial prototype building archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BuildingType {
    FullServiceRestaurant,
    Hospital,
    HighriseApartment,
    LargeHotel,
    LargeOffice,
    MediumOffice,
    MidriseApartment,
    Outpatient,
    PrimarySchool,
    QuickServiceRestaurant,
    RetailStandalone,
    SecondarySchool,
    SmallHotel,
    SmallOffice,
    RetailStripmall,
    Warehouse,
}

impl BuildingType {
    pub fn all() -> &'static [BuildingType] {
        &[
            Self::FullServiceRestaurant,
            Self::Hospital,
            Self::HighriseApartment,
            Self::LargeHotel,
            Self::LargeOffice,
            Self::MediumOffice,
            Self::MidriseApartment,
            Self::Outpatient,
            Self::PrimarySchool,
            Self::QuickServiceRestaurant,
            Self::RetailStandalone,
            Self::SecondarySchool,
            Self::SmallHotel,
            Self::SmallOffice,
            Self::RetailStripmall,
            Self::Warehouse,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullServiceRestaurant => "FullServiceRestaurant",
            Self::Hospital => "Hospital",
            Self::HighriseApartment => "HighriseApartment",
            Self::LargeHotel => "LargeHotel",
            Self::LargeOffice => "LargeOffice",
            Self::MediumOffice => "MediumOffice",
            Self::MidriseApartment => "MidriseApartment",
            Self::Outpatient => "Outpatient",
            Self::PrimarySchool => "PrimarySchool",
            Self::QuickServiceRestaurant => "QuickServiceRestaurant",
            Self::RetailStandalone => "RetailStandalone",
            Self::SecondarySchool => "SecondarySchool",
            Self::SmallHotel => "SmallHotel",
            Self::SmallOffice => "SmallOffice",
            Self::RetailStripmall => "RetailStripmall",
            Self::Warehouse => "Warehouse",
        }
    }

    /// Building type name used as the key in space type tables. The office
    /// sizes share one set of space types, as do the two retail formats.
    pub fn lookup_name(&self) -> &'static str {
        match self {
            Self::SmallOffice | Self::MediumOffice | Self::LargeOffice => "Office",
            Self::RetailStripmall => "StripMall",
            Self::RetailStandalone => "Retail",
            other => other.as_str(),
        }
    }
}

impl std::fmt::Display for BuildingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildingType {
    type Err = StandardsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| StandardsError::UnknownBuildingType(s.to_string()))
    }
}

impl TryFrom<String> for BuildingType {
    type Error = StandardsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BuildingType> for String {
    fn from(value: BuildingType) -> Self {
        value.as_str().to_string()
    }
}

// ─── Prototype records ──────────────────────────────────────────────────────

/// Which prototype to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrototypeConfig {
    pub template: Template,
    pub building_type: BuildingType,
}

/// One `prototype_inputs` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrototypeInput {
    pub template: String,
    pub building_type: String,
    pub floor_area_m2: f64,
    pub number_of_stories: u32,
    /// Remaining table columns, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A resolved prototype.
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub config: PrototypeConfig,
    pub input: PrototypeInput,
    pub lookup_building_type: &'static str,
}

/// Registry of prototype inputs keyed by configuration.
#[derive(Debug, Clone, Default)]
pub struct PrototypeRegistry {
    inputs: BTreeMap<(Template, BuildingType), PrototypeInput>,
    results: Vec<PrototypeResultRow>,
    space_types: Vec<SpaceTypeRow>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct PrototypeResultRow {
    template: String,
    building_type: String,
    climate_zone: String,
    fuel_type: String,
    end_uses_gj: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct SpaceTypeRow {
    template: String,
    building_type: String,
    space_type: String,
    #[serde(default)]
    is_residential: bool,
}

impl PrototypeRegistry {
    /// Build the registry from the prototype tables. Rows naming a template
    /// or building type this crate does not know are skipped with a warning;
    /// the first row for a pair wins.
    pub fn from_data(data: &StandardsData) -> StandardsResult<Self> {
        let mut registry = Self::default();

        for row in data.table(PROTOTYPE_INPUTS).unwrap_or_default() {
            let input: PrototypeInput = decode(PROTOTYPE_INPUTS, row)?;
            let (Ok(template), Ok(building_type)) = (
                input.template.parse::<Template>(),
                input.building_type.parse::<BuildingType>(),
            ) else {
                tracing::warn!(
                    template = %input.template,
                    building_type = %input.building_type,
                    "skipping prototype input with unrecognized keys"
                );
                continue;
            };
            registry
                .inputs
                .entry((template, building_type))
                .or_insert(input);
        }

        for row in data.table(PROTOTYPE_RESULTS).unwrap_or_default() {
            registry.results.push(decode(PROTOTYPE_RESULTS, row)?);
        }
        for row in data.table(SPACE_TYPES).unwrap_or_default() {
            registry.space_types.push(decode(SPACE_TYPES, row)?);
        }

        tracing::debug!(
            prototypes = registry.inputs.len(),
            results = registry.results.len(),
            space_types = registry.space_types.len(),
            "built prototype registry"
        );
        Ok(registry)
    }

    /// Number of registered prototypes.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Look up the prototype for `config`.
    pub fn resolve(&self, config: &PrototypeConfig) -> StandardsResult<Prototype> {
        let input = self
            .inputs
            .get(&(config.template, config.building_type))
            .ok_or_else(|| {
                tracing::error!(
                    template = %config.template,
                    building_type = %config.building_type,
                    "no prototype inputs, cannot create model"
                );
                StandardsError::PrototypeNotFound {
                    template: config.template.to_string(),
                    building_type: config.building_type.to_string(),
                }
            })?;
        Ok(Prototype {
            config: *config,
            input: input.clone(),
            lookup_building_type: config.building_type.lookup_name(),
        })
    }

    /// Stored simulation results of the prototype summed across fuels, in GJ
    /// per end use. Empty when no results are stored for the combination.
    pub fn end_use_totals(
        &self,
        template: Template,
        building_type: BuildingType,
        climate_zone_code: &str,
    ) -> BTreeMap<String, f64> {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for row in self.results.iter().filter(|r| {
            r.template == template.as_str()
                && r.building_type == building_type.as_str()
                && r.climate_zone == climate_zone_code
        }) {
            tracing::trace!(fuel = %row.fuel_type, "accumulating prototype end uses");
            for (end_use, gj) in &row.end_uses_gj {
                *totals.entry(end_use.clone()).or_insert(0.0) += gj;
            }
        }
        totals
    }

    /// Whether the standards space type is residential. `None` when the
    /// space type is not in the table.
    pub fn space_type_is_residential(
        &self,
        template: Template,
        building_type: &str,
        space_type: &str,
    ) -> Option<bool> {
        self.space_types
            .iter()
            .find(|r| {
                r.template == template.as_str()
                    && r.building_type == building_type
                    && r.space_type == space_type
            })
            .map(|r| r.is_residential)
    }
}

fn decode<T: serde::de::DeserializeOwned>(table: &str, row: &Value) -> StandardsResult<T> {
    T::deserialize(row).map_err(|source| StandardsError::MalformedRow {
        table: table.to_string(),
        source,
    })
}

/// Convenience search on the raw prototype inputs table.
pub fn prototype_input_criteria(config: &PrototypeConfig) -> SearchCriteria {
    SearchCriteria::new()
        .with("template", config.template.as_str())
        .with("building_type", config.building_type.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> PrototypeRegistry {
        PrototypeRegistry::from_data(&StandardsData::bundled().unwrap()).unwrap()
    }

    #[test]
    fn test_building_type_roundtrip() {
        for b in BuildingType::all() {
            assert_eq!(b.as_str().parse::<BuildingType>().unwrap(), *b);
        }
        assert_eq!(BuildingType::all().len(), 16);
        assert!("Skyscraper".parse::<BuildingType>().is_err());
    }

    #[test]
    fn test_lookup_names() {
        assert_eq!(BuildingType::SmallOffice.lookup_name(), "Office");
        assert_eq!(BuildingType::LargeOffice.lookup_name(), "Office");
        assert_eq!(BuildingType::RetailStripmall.lookup_name(), "StripMall");
        assert_eq!(BuildingType::RetailStandalone.lookup_name(), "Retail");
        assert_eq!(BuildingType::Hospital.lookup_name(), "Hospital");
    }

    #[test]
    fn test_resolve_large_hotel() {
        let config = PrototypeConfig {
            template: Template::Ashrae2007,
            building_type: BuildingType::LargeHotel,
        };
        let proto = registry().resolve(&config).unwrap();
        assert_eq!(proto.input.floor_area_m2, 11345.0);
        assert_eq!(proto.lookup_building_type, "LargeHotel");
    }

    #[test]
    fn test_resolve_missing_is_hard_error() {
        let config = PrototypeConfig {
            template: Template::Necb2017,
            building_type: BuildingType::Hospital,
        };
        let err = registry().resolve(&config).unwrap_err();
        assert!(matches!(err, StandardsError::PrototypeNotFound { .. }));
    }

    #[test]
    fn test_end_use_totals_sum_fuels() {
        let totals = registry().end_use_totals(Template::Ashrae2007, BuildingType::LargeHotel, "2A");
        let equipment = totals.get("Interior Equipment").copied().unwrap();
        assert!((equipment - (1751.31 + 1788.85)).abs() < 1e-9);
        assert!(registry()
            .end_use_totals(Template::Ashrae2007, BuildingType::LargeHotel, "5A")
            .is_empty());
    }

    #[test]
    fn test_space_type_residential() {
        let r = registry();
        assert_eq!(
            r.space_type_is_residential(Template::Ashrae2019, "MidriseApartment", "Apartment"),
            Some(true)
        );
        assert_eq!(
            r.space_type_is_residential(Template::Ashrae2019, "LargeHotel", "Lobby"),
            Some(false)
        );
        assert_eq!(r.space_type_is_residential(Template::Ashrae2019, "Warehouse", "Bulk"), None);
    }

    #[test]
    fn test_config_from_yaml_like_json() {
        let config: PrototypeConfig = serde_json::from_str(
            r#"{"template": "90.1-2013", "building_type": "SmallOffice"}"#,
        )
        .unwrap();
        assert_eq!(config.building_type, BuildingType::SmallOffice);
        assert!(StandardsData::bundled()
            .unwrap()
            .find_object(PROTOTYPE_INPUTS, &prototype_input_criteria(&config))
            .is_some());
    }
}
