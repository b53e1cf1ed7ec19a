//! # User Data — Project-Specific Overrides
//!
//! Typed views over the `userdata_*` tables a modeler supplies alongside the
//! model, usually as CSV exports. They carry building-area-type overrides
//! and demand-control-ventilation exceptions keyed by object name.
//!
//! Names are matched case-insensitively after trimming. Flags accept either
//! JSON booleans or the strings `TRUE`/`FALSE` in any case.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::data::StandardsData;
use crate::error::{StandardsError, StandardsResult};

pub const USERDATA_AIRLOOP_HVAC: &str = "userdata_airloop_hvac";
pub const USERDATA_THERMAL_ZONE: &str = "userdata_thermal_zone";
pub const USERDATA_BUILDING: &str = "userdata_building";
pub const USERDATA_SPACE: &str = "userdata_space";
pub const USERDATA_WATERUSE_EQUIPMENT: &str = "userdata_wateruse_equipment";

/// A yes/no cell.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UserFlag {
    Bool(bool),
    Text(String),
}

impl UserFlag {
    pub fn is_true(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => s.trim().eq_ignore_ascii_case("true"),
        }
    }
}

/// Whether an optional flag is set.
pub fn flag_is_true(flag: Option<&UserFlag>) -> bool {
    flag.map_or(false, UserFlag::is_true)
}

/// Case-insensitive, whitespace-trimmed name comparison.
pub fn names_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserDataAirLoop {
    pub name: String,
    #[serde(default)]
    pub dcv_exception_airloop: Option<UserFlag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserDataThermalZone {
    pub name: String,
    #[serde(default)]
    pub building_type_for_hvac: Option<String>,
    #[serde(default)]
    pub dcv_exception_thermal_zone: Option<UserFlag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserDataBuilding {
    pub name: String,
    #[serde(default)]
    pub building_type_for_hvac: Option<String>,
    #[serde(default)]
    pub building_type_for_wwr: Option<String>,
    #[serde(default)]
    pub building_type_for_swh: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserDataSpace {
    pub name: String,
    #[serde(default)]
    pub building_type_for_wwr: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserDataWaterUseEquipment {
    pub name: String,
    #[serde(default)]
    pub building_type_for_swh: Option<String>,
}

/// All user data tables present in a standards database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserData {
    pub air_loops: Vec<UserDataAirLoop>,
    pub thermal_zones: Vec<UserDataThermalZone>,
    pub buildings: Vec<UserDataBuilding>,
    pub spaces: Vec<UserDataSpace>,
    pub water_use_equipment: Vec<UserDataWaterUseEquipment>,
}

impl UserData {
    /// Decode every `userdata_*` table. Absent tables decode as empty.
    pub fn from_standards(data: &StandardsData) -> StandardsResult<Self> {
        let user_data = Self {
            air_loops: decode_table(data, USERDATA_AIRLOOP_HVAC)?,
            thermal_zones: decode_table(data, USERDATA_THERMAL_ZONE)?,
            buildings: decode_table(data, USERDATA_BUILDING)?,
            spaces: decode_table(data, USERDATA_SPACE)?,
            water_use_equipment: decode_table(data, USERDATA_WATERUSE_EQUIPMENT)?,
        };
        tracing::debug!(
            air_loops = user_data.air_loops.len(),
            thermal_zones = user_data.thermal_zones.len(),
            buildings = user_data.buildings.len(),
            spaces = user_data.spaces.len(),
            water_use_equipment = user_data.water_use_equipment.len(),
            "decoded user data"
        );
        Ok(user_data)
    }

    pub fn is_empty(&self) -> bool {
        self.air_loops.is_empty()
            && self.thermal_zones.is_empty()
            && self.buildings.is_empty()
            && self.spaces.is_empty()
            && self.water_use_equipment.is_empty()
    }

    pub fn air_loop(&self, name: &str) -> Option<&UserDataAirLoop> {
        self.air_loops.iter().find(|r| names_match(&r.name, name))
    }

    pub fn thermal_zone(&self, name: &str) -> Option<&UserDataThermalZone> {
        self.thermal_zones.iter().find(|r| names_match(&r.name, name))
    }

    pub fn building(&self, name: &str) -> Option<&UserDataBuilding> {
        self.buildings.iter().find(|r| names_match(&r.name, name))
    }

    pub fn space(&self, name: &str) -> Option<&UserDataSpace> {
        self.spaces.iter().find(|r| names_match(&r.name, name))
    }

    pub fn water_use_equipment(&self, name: &str) -> Option<&UserDataWaterUseEquipment> {
        self.water_use_equipment
            .iter()
            .find(|r| names_match(&r.name, name))
    }
}

fn decode_table<T: DeserializeOwned>(data: &StandardsData, table: &str) -> StandardsResult<Vec<T>> {
    let Some(rows) = data.table(table) else {
        return Ok(Vec::new());
    };
    rows.iter()
        .map(|row| {
            T::deserialize(row).map_err(|source| StandardsError::MalformedRow {
                table: table.to_string(),
                source,
            })
        })
        .collect()
}
