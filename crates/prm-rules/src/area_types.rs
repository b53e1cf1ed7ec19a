//! # Building Area Types
//!
//! A baseline building may mix area types: one part residential, another
//! retail. Each thermal zone gets an HVAC area type, each space a
//! window-to-wall-ratio area type, and each water-use equipment a service
//! water heating area type, resolved by the first source that names one:
//!
//! 1. the object's own user-data row,
//! 2. the user-data row of the building,
//! 3. the run's defaults.
//!
//! The result is returned as a typed assignment; nothing is written onto
//! model objects.

use std::collections::BTreeMap;

use serde::Serialize;

use prm_model::Model;
use prm_standards::{names_match, UserData};

use crate::config::AreaTypeDefaults;

/// Where an assigned area type came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaTypeSource {
    UserData,
    Building,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignedAreaType {
    pub area_type: String,
    pub source: AreaTypeSource,
}

/// Area types keyed by object name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildingAreaTypeAssignment {
    pub hvac: BTreeMap<String, AssignedAreaType>,
    pub wwr: BTreeMap<String, AssignedAreaType>,
    pub swh: BTreeMap<String, AssignedAreaType>,
    /// User-data zone rows naming no zone in the model.
    pub unmatched_user_zones: Vec<String>,
}

impl BuildingAreaTypeAssignment {
    pub fn hvac_area_type(&self, zone: &str) -> Option<&str> {
        self.hvac.get(zone).map(|a| a.area_type.as_str())
    }

    pub fn wwr_area_type(&self, space: &str) -> Option<&str> {
        self.wwr.get(space).map(|a| a.area_type.as_str())
    }

    pub fn swh_area_type(&self, equipment: &str) -> Option<&str> {
        self.swh.get(equipment).map(|a| a.area_type.as_str())
    }

    /// Zone names grouped by HVAC area type.
    pub fn zones_by_hvac_area_type(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (zone, assigned) in &self.hvac {
            groups.entry(assigned.area_type.as_str()).or_default().push(zone.as_str());
        }
        groups
    }
}

/// A present user-data row with a blank area type falls through to the next
/// level, same as a missing row.
fn resolve(own: Option<&String>, building: Option<&String>, default: &str) -> AssignedAreaType {
    let own = own.filter(|t| !t.trim().is_empty());
    let building = building.filter(|t| !t.trim().is_empty());
    if let Some(t) = own {
        AssignedAreaType {
            area_type: t.clone(),
            source: AreaTypeSource::UserData,
        }
    } else if let Some(t) = building {
        AssignedAreaType {
            area_type: t.clone(),
            source: AreaTypeSource::Building,
        }
    } else {
        AssignedAreaType {
            area_type: default.to_string(),
            source: AreaTypeSource::Default,
        }
    }
}

/// Resolve HVAC, WWR, and SWH area types for every zone, space, and
/// water-use equipment in the model.
pub fn handle_multi_building_area_types(
    model: &Model,
    defaults: &AreaTypeDefaults,
    user_data: &UserData,
) -> BuildingAreaTypeAssignment {
    let building = user_data.building(&model.building.name);
    let mut assignment = BuildingAreaTypeAssignment::default();

    for zone in &model.thermal_zones {
        let own = user_data
            .thermal_zone(&zone.name)
            .and_then(|r| r.building_type_for_hvac.as_ref());
        let assigned = resolve(own, building.and_then(|b| b.building_type_for_hvac.as_ref()), &defaults.hvac);
        assignment.hvac.insert(zone.name.clone(), assigned);
    }
    for row in &user_data.thermal_zones {
        if !model.thermal_zones.iter().any(|z| names_match(&z.name, &row.name)) {
            tracing::error!(zone = %row.name, "no thermal zone with this name in the model, check user data");
            assignment.unmatched_user_zones.push(row.name.clone());
        }
    }

    for space in &model.spaces {
        let own = user_data
            .space(&space.name)
            .and_then(|r| r.building_type_for_wwr.as_ref());
        let assigned = resolve(own, building.and_then(|b| b.building_type_for_wwr.as_ref()), &defaults.wwr);
        assignment.wwr.insert(space.name.clone(), assigned);
    }

    for equipment in &model.water_use_equipment {
        let own = user_data
            .water_use_equipment(&equipment.name)
            .and_then(|r| r.building_type_for_swh.as_ref());
        let assigned = resolve(own, building.and_then(|b| b.building_type_for_swh.as_ref()), &defaults.swh);
        assignment.swh.insert(equipment.name.clone(), assigned);
    }

    tracing::info!(
        zones = assignment.hvac.len(),
        spaces = assignment.wwr.len(),
        water_use_equipment = assignment.swh.len(),
        "resolved building area types"
    );
    assignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use prm_model::{Space, ThermalZone, WaterUseEquipment};
    use prm_standards::{UserDataBuilding, UserDataSpace, UserDataThermalZone, UserDataWaterUseEquipment};

    fn defaults() -> AreaTypeDefaults {
        AreaTypeDefaults {
            hvac: "nonresidential".into(),
            wwr: "office".into(),
            swh: "office".into(),
        }
    }

    fn model() -> Model {
        let mut model = Model::new("Tower");
        model.add_thermal_zone(ThermalZone::new("Lobby"));
        model.add_thermal_zone(ThermalZone::new("Units"));
        model.add_space(Space::new("Lobby Space", 100.0, 300.0));
        model.add_space(Space::new("Unit 101", 80.0, 240.0));
        model.water_use_equipment.push(WaterUseEquipment::new("Unit Sinks"));
        model
    }

    #[test]
    fn test_defaults_without_user_data() {
        let a = handle_multi_building_area_types(&model(), &defaults(), &UserData::default());
        assert_eq!(a.hvac_area_type("Lobby"), Some("nonresidential"));
        assert_eq!(a.wwr_area_type("Unit 101"), Some("office"));
        assert_eq!(a.swh_area_type("Unit Sinks"), Some("office"));
        assert!(a.hvac.values().all(|v| v.source == AreaTypeSource::Default));
    }

    #[test]
    fn test_hierarchy() {
        let user_data = UserData {
            thermal_zones: vec![
                UserDataThermalZone {
                    name: "units".into(),
                    building_type_for_hvac: Some("residential".into()),
                    dcv_exception_thermal_zone: None,
                },
                UserDataThermalZone {
                    name: "Garage".into(),
                    building_type_for_hvac: Some("heatedonly".into()),
                    dcv_exception_thermal_zone: None,
                },
            ],
            buildings: vec![UserDataBuilding {
                name: "Tower".into(),
                building_type_for_hvac: Some("retail".into()),
                building_type_for_wwr: Some("multifamily".into()),
                building_type_for_swh: None,
            }],
            spaces: vec![UserDataSpace {
                name: "Lobby Space".into(),
                building_type_for_wwr: Some("retail".into()),
            }],
            water_use_equipment: vec![UserDataWaterUseEquipment {
                name: "Unit Sinks".into(),
                building_type_for_swh: Some("multifamily".into()),
            }],
            ..UserData::default()
        };
        let a = handle_multi_building_area_types(&model(), &defaults(), &user_data);

        assert_eq!(a.hvac["Units"].area_type, "residential");
        assert_eq!(a.hvac["Units"].source, AreaTypeSource::UserData);
        assert_eq!(a.hvac["Lobby"].area_type, "retail");
        assert_eq!(a.hvac["Lobby"].source, AreaTypeSource::Building);
        assert_eq!(a.wwr_area_type("Lobby Space"), Some("retail"));
        assert_eq!(a.wwr_area_type("Unit 101"), Some("multifamily"));
        assert_eq!(a.swh_area_type("Unit Sinks"), Some("multifamily"));
        assert_eq!(a.unmatched_user_zones, vec!["Garage".to_string()]);

        let groups = a.zones_by_hvac_area_type();
        assert_eq!(groups["residential"], vec!["Units"]);
        assert_eq!(groups["retail"], vec!["Lobby"]);
    }

    #[test]
    fn test_zone_row_without_area_type_uses_building() {
        let zone_row = |name: &str, area_type: Option<&str>| UserDataThermalZone {
            name: name.into(),
            building_type_for_hvac: area_type.map(Into::into),
            dcv_exception_thermal_zone: Some(prm_standards::UserFlag::Text("TRUE".into())),
        };
        let user_data = UserData {
            thermal_zones: vec![zone_row("Lobby", None), zone_row("Units", Some("  "))],
            buildings: vec![UserDataBuilding {
                name: "Tower".into(),
                building_type_for_hvac: Some("retail".into()),
                building_type_for_wwr: Some("".into()),
                building_type_for_swh: None,
            }],
            ..UserData::default()
        };
        let a = handle_multi_building_area_types(&model(), &defaults(), &user_data);

        for zone in ["Lobby", "Units"] {
            assert_eq!(a.hvac[zone].area_type, "retail");
            assert_eq!(a.hvac[zone].source, AreaTypeSource::Building);
        }
        assert_eq!(a.wwr["Lobby Space"].source, AreaTypeSource::Default);
        assert!(a.unmatched_user_zones.is_empty());
    }

    #[test]
    fn test_empty_csv_cell_falls_back_to_building() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("userdata_thermal_zone.csv"),
            "name,building_type_for_hvac,dcv_exception_thermal_zone\nLobby,,TRUE\nUnits,residential,\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("userdata_building.csv"),
            "name,building_type_for_hvac,building_type_for_wwr,building_type_for_swh\nTower,heatedonly,,\n",
        )
        .unwrap();
        let data = prm_standards::StandardsData::load_dir(dir.path()).unwrap();
        let user_data = UserData::from_standards(&data).unwrap();

        let a = handle_multi_building_area_types(&model(), &defaults(), &user_data);
        assert_eq!(a.hvac_area_type("Lobby"), Some("heatedonly"));
        assert_eq!(a.hvac["Lobby"].source, AreaTypeSource::Building);
        assert_eq!(a.hvac_area_type("Units"), Some("residential"));
        assert_eq!(a.hvac["Units"].source, AreaTypeSource::UserData);
        assert_eq!(a.wwr_area_type("Unit 101"), Some("office"));
    }
}
