//! # Internal Loads, Building, and Service Water Use
//!
//! People, lighting, and equipment loads hosted by a space or a space type,
//! plus the building-level record and water-use equipment.

use serde::{Deserialize, Serialize};

use prm_core::{LoadId, ScheduleId, SpaceId, SpaceTypeId, WaterUseEquipmentId};

/// Internal load category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadKind {
    People,
    Lights,
    ElectricEquipment,
    GasEquipment,
}

impl LoadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::People => "People",
            Self::Lights => "Lights",
            Self::ElectricEquipment => "ElectricEquipment",
            Self::GasEquipment => "GasEquipment",
        }
    }
}

/// Object a load is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id")]
pub enum LoadHost {
    Space(SpaceId),
    SpaceType(SpaceTypeId),
}

/// Load magnitude: absolute, or per m² of floor for the hosting space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "basis", content = "value", rename_all = "snake_case")]
pub enum LoadAmount {
    Absolute(f64),
    PerFloorArea(f64),
}

impl LoadAmount {
    /// Magnitude for a space of `floor_area_m2`.
    pub fn resolve(&self, floor_area_m2: f64) -> f64 {
        match self {
            Self::Absolute(v) => *v,
            Self::PerFloorArea(v) => v * floor_area_m2,
        }
    }
}

/// An internal load. For people the amount is a head count; otherwise watts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceLoad {
    pub id: LoadId,
    pub name: String,
    pub kind: LoadKind,
    pub host: LoadHost,
    pub amount: LoadAmount,
    #[serde(default)]
    pub schedule: Option<ScheduleId>,
}

impl SpaceLoad {
    pub fn new(name: impl Into<String>, kind: LoadKind, host: LoadHost, amount: LoadAmount) -> Self {
        Self {
            id: LoadId::new(),
            name: name.into(),
            kind,
            host,
            amount,
            schedule: None,
        }
    }
}

/// Building-level record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub name: String,
    #[serde(default)]
    pub standards_building_type: Option<String>,
    /// Short ASHRAE climate zone code such as `2A`.
    #[serde(default)]
    pub climate_zone: Option<String>,
    #[serde(default)]
    pub number_of_stories: Option<u32>,
}

/// Service water-use equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterUseEquipment {
    pub id: WaterUseEquipmentId,
    pub name: String,
    #[serde(default)]
    pub space: Option<SpaceId>,
}

impl WaterUseEquipment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: WaterUseEquipmentId::new(),
            name: name.into(),
            space: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_resolution() {
        assert_eq!(LoadAmount::Absolute(12.0).resolve(500.0), 12.0);
        assert_eq!(LoadAmount::PerFloorArea(0.05).resolve(200.0), 10.0);
    }

    #[test]
    fn test_host_serde_shape() {
        let host = LoadHost::Space(SpaceId::new());
        let json = serde_json::to_value(host).unwrap();
        assert_eq!(json["type"], "Space");
        assert!(json["id"].is_string());
    }
}
