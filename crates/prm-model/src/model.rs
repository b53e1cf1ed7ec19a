//! # Model — The Building Object Graph
//!
//! Owns every object of one building model and provides typed navigation
//! between them. Objects refer to each other by identifier; the model is the
//! only place those identifiers are resolved.
//!
//! ## Design
//!
//! Rule functions take `&Model` for inspection and `&mut Model` when they
//! rewrite the graph. Single ownership of the model expresses the
//! single-writer batch processing the rules assume.

use serde::{Deserialize, Serialize};

use prm_core::{AirLoopId, ScheduleId, SpaceId, SpaceTypeId, ThermalZoneId};

use crate::ems::Ems;
use crate::error::ModelError;
use crate::hvac::{AirLoop, SetpointManagerScheduled, ThermalZone};
use crate::loads::{Building, LoadHost, LoadKind, SpaceLoad, WaterUseEquipment};
use crate::schedule::Schedule;
use crate::space::{DesignSpecificationOutdoorAir, EffectiveLeakageArea, Space, SpaceType};

/// Name of the always-on discrete schedule every model carries.
pub const ALWAYS_ON_DISCRETE: &str = "Always On Discrete";

/// A building model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub building: Building,
    #[serde(default)]
    pub space_types: Vec<SpaceType>,
    #[serde(default)]
    pub spaces: Vec<Space>,
    #[serde(default)]
    pub thermal_zones: Vec<ThermalZone>,
    #[serde(default)]
    pub air_loops: Vec<AirLoop>,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
    #[serde(default)]
    pub loads: Vec<SpaceLoad>,
    #[serde(default)]
    pub effective_leakage_areas: Vec<EffectiveLeakageArea>,
    #[serde(default)]
    pub setpoint_managers: Vec<SetpointManagerScheduled>,
    #[serde(default)]
    pub water_use_equipment: Vec<WaterUseEquipment>,
    #[serde(default)]
    pub ems: Ems,
}

impl Model {
    /// An empty model containing only the always-on discrete schedule.
    pub fn new(building_name: impl Into<String>) -> Self {
        Self {
            building: Building {
                name: building_name.into(),
                standards_building_type: None,
                climate_zone: None,
                number_of_stories: None,
            },
            space_types: Vec::new(),
            spaces: Vec::new(),
            thermal_zones: Vec::new(),
            air_loops: Vec::new(),
            schedules: vec![Schedule::constant(ALWAYS_ON_DISCRETE, 1.0)],
            loads: Vec::new(),
            effective_leakage_areas: Vec::new(),
            setpoint_managers: Vec::new(),
            water_use_equipment: Vec::new(),
            ems: Ems::default(),
        }
    }

    // ----- Insertion -----

    pub fn add_space_type(&mut self, space_type: SpaceType) -> SpaceTypeId {
        let id = space_type.id;
        self.space_types.push(space_type);
        id
    }

    pub fn add_space(&mut self, space: Space) -> SpaceId {
        let id = space.id;
        self.spaces.push(space);
        id
    }

    pub fn add_thermal_zone(&mut self, zone: ThermalZone) -> ThermalZoneId {
        let id = zone.id;
        self.thermal_zones.push(zone);
        id
    }

    pub fn add_air_loop(&mut self, air_loop: AirLoop) -> AirLoopId {
        let id = air_loop.id;
        self.air_loops.push(air_loop);
        id
    }

    /// Add a schedule. Schedule names are unique within a model.
    pub fn add_schedule(&mut self, schedule: Schedule) -> Result<ScheduleId, ModelError> {
        if self.schedules.iter().any(|s| s.name == schedule.name) {
            return Err(ModelError::DuplicateName {
                kind: "schedule",
                name: schedule.name,
            });
        }
        let id = schedule.id;
        self.schedules.push(schedule);
        Ok(id)
    }

    /// Add a schedule, replacing any existing schedule of the same name.
    /// The existing identifier is kept so references stay valid.
    pub fn upsert_schedule(&mut self, mut schedule: Schedule) -> ScheduleId {
        match self.schedules.iter_mut().find(|s| s.name == schedule.name) {
            Some(existing) => {
                schedule.id = existing.id;
                *existing = schedule;
                existing.id
            }
            None => {
                let id = schedule.id;
                self.schedules.push(schedule);
                id
            }
        }
    }

    pub fn add_load(&mut self, load: SpaceLoad) {
        self.loads.push(load);
    }

    /// Add a scheduled setpoint manager, replacing one of the same name.
    pub fn upsert_setpoint_manager(&mut self, manager: SetpointManagerScheduled) {
        match self
            .setpoint_managers
            .iter_mut()
            .find(|m| m.name == manager.name)
        {
            Some(slot) => *slot = manager,
            None => self.setpoint_managers.push(manager),
        }
    }

    /// Place `space` in `zone`.
    pub fn assign_space_to_zone(&mut self, space: SpaceId, zone: ThermalZoneId) -> Result<(), ModelError> {
        self.thermal_zone(zone)?;
        self.space_mut(space)?.thermal_zone = Some(zone);
        Ok(())
    }

    // ----- Lookup -----

    pub fn space(&self, id: SpaceId) -> Result<&Space, ModelError> {
        self.spaces
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("space", id))
    }

    pub fn space_mut(&mut self, id: SpaceId) -> Result<&mut Space, ModelError> {
        self.spaces
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("space", id))
    }

    pub fn space_type(&self, id: SpaceTypeId) -> Result<&SpaceType, ModelError> {
        self.space_types
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("space type", id))
    }

    pub fn space_type_mut(&mut self, id: SpaceTypeId) -> Result<&mut SpaceType, ModelError> {
        self.space_types
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("space type", id))
    }

    pub fn thermal_zone(&self, id: ThermalZoneId) -> Result<&ThermalZone, ModelError> {
        self.thermal_zones
            .iter()
            .find(|z| z.id == id)
            .ok_or_else(|| not_found("thermal zone", id))
    }

    pub fn thermal_zone_mut(&mut self, id: ThermalZoneId) -> Result<&mut ThermalZone, ModelError> {
        self.thermal_zones
            .iter_mut()
            .find(|z| z.id == id)
            .ok_or_else(|| not_found("thermal zone", id))
    }

    pub fn air_loop(&self, id: AirLoopId) -> Result<&AirLoop, ModelError> {
        self.air_loops
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| not_found("air loop", id))
    }

    pub fn air_loop_mut(&mut self, id: AirLoopId) -> Result<&mut AirLoop, ModelError> {
        self.air_loops
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| not_found("air loop", id))
    }

    pub fn schedule(&self, id: ScheduleId) -> Result<&Schedule, ModelError> {
        self.schedules
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("schedule", id))
    }

    pub fn schedule_mut(&mut self, id: ScheduleId) -> Result<&mut Schedule, ModelError> {
        self.schedules
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("schedule", id))
    }

    pub fn schedule_by_name(&self, name: &str) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.name == name)
    }

    pub fn thermal_zone_by_name(&self, name: &str) -> Option<&ThermalZone> {
        self.thermal_zones.iter().find(|z| z.name == name)
    }

    pub fn air_loop_by_name(&self, name: &str) -> Option<&AirLoop> {
        self.air_loops.iter().find(|l| l.name == name)
    }

    /// The always-on discrete schedule.
    pub fn always_on_discrete_schedule(&self) -> Option<ScheduleId> {
        self.schedule_by_name(ALWAYS_ON_DISCRETE).map(|s| s.id)
    }

    // ----- Navigation -----

    /// Spaces in `zone`, sorted by name.
    pub fn zone_spaces(&self, zone: ThermalZoneId) -> Vec<&Space> {
        let mut spaces: Vec<&Space> = self
            .spaces
            .iter()
            .filter(|s| s.thermal_zone == Some(zone))
            .collect();
        spaces.sort_by(|a, b| a.name.cmp(&b.name));
        spaces
    }

    /// Air loops serving `zone`.
    pub fn zone_air_loops(&self, zone: ThermalZoneId) -> Vec<&AirLoop> {
        self.air_loops.iter().filter(|l| l.serves(zone)).collect()
    }

    /// Zones served by `air_loop`, sorted by name.
    pub fn air_loop_zones(&self, air_loop: AirLoopId) -> Result<Vec<&ThermalZone>, ModelError> {
        let l = self.air_loop(air_loop)?;
        let mut zones = l
            .thermal_zones()
            .map(|z| self.thermal_zone(z))
            .collect::<Result<Vec<_>, _>>()?;
        zones.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(zones)
    }

    /// Space multiplier, inherited from the space's thermal zone.
    pub fn space_multiplier(&self, space: &Space) -> f64 {
        space
            .thermal_zone
            .and_then(|z| self.thermal_zone(z).ok())
            .map_or(1.0, |z| f64::from(z.multiplier))
    }

    /// Space type of `space`, if assigned and present.
    pub fn space_type_of(&self, space: &Space) -> Option<&SpaceType> {
        space.space_type.and_then(|id| self.space_type(id).ok())
    }

    /// Outdoor-air specification of the space, else of its space type.
    pub fn space_design_outdoor_air<'a>(&'a self, space: &'a Space) -> Option<&'a DesignSpecificationOutdoorAir> {
        space
            .design_outdoor_air
            .as_ref()
            .or_else(|| self.space_type_of(space).and_then(|st| st.design_outdoor_air.as_ref()))
    }

    /// Loads hosted directly by `space` or by its space type.
    pub fn space_loads<'a>(&'a self, space: &'a Space) -> impl Iterator<Item = &'a SpaceLoad> + 'a {
        self.loads.iter().filter(move |l| match l.host {
            LoadHost::Space(id) => id == space.id,
            LoadHost::SpaceType(id) => space.space_type == Some(id),
        })
    }

    /// Number of people in `space`.
    pub fn space_number_of_people(&self, space: &Space) -> f64 {
        self.space_loads(space)
            .filter(|l| l.kind == LoadKind::People)
            .map(|l| l.amount.resolve(space.floor_area))
            .sum()
    }

    /// Floor area of conditioned and semiheated spaces, including multipliers.
    pub fn conditioned_floor_area(&self) -> f64 {
        self.spaces
            .iter()
            .filter(|s| s.conditioning != crate::space::ConditioningCategory::Unconditioned)
            .map(|s| s.floor_area * self.space_multiplier(s))
            .sum()
    }

    /// Space type hosting a load, directly or through its space.
    pub fn load_space_type(&self, load: &SpaceLoad) -> Option<&SpaceType> {
        match load.host {
            LoadHost::SpaceType(id) => self.space_type(id).ok(),
            LoadHost::Space(id) => self.space(id).ok().and_then(|s| self.space_type_of(s)),
        }
    }
}

fn not_found(kind: &'static str, key: impl std::fmt::Display) -> ModelError {
    ModelError::NotFound {
        kind,
        key: key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hvac::AirTerminalKind;
    use crate::loads::LoadAmount;

    #[test]
    fn test_new_model_has_always_on() {
        let m = Model::new("b");
        let id = m.always_on_discrete_schedule().unwrap();
        assert_eq!(m.schedule(id).unwrap().annual_hours_above(0.0), 8760.0);
    }

    #[test]
    fn test_duplicate_schedule_rejected() {
        let mut m = Model::new("b");
        assert!(m.add_schedule(Schedule::constant(ALWAYS_ON_DISCRETE, 0.0)).is_err());
    }

    #[test]
    fn test_upsert_schedule_keeps_id() {
        let mut m = Model::new("b");
        let id = m.add_schedule(Schedule::constant("x", 1.0)).unwrap();
        let again = m.upsert_schedule(Schedule::constant("x", 2.0));
        assert_eq!(id, again);
        assert_eq!(m.schedules.len(), 2);
    }

    #[test]
    fn test_zone_navigation_and_multiplier() {
        let mut m = Model::new("b");
        let mut zone = ThermalZone::new("Z1");
        zone.multiplier = 3;
        let z = m.add_thermal_zone(zone);
        let s = m.add_space(Space::new("S1", 100.0, 300.0));
        m.assign_space_to_zone(s, z).unwrap();
        let mut l = AirLoop::new("VAV_1");
        l.add_branch(z, AirTerminalKind::VavReheat);
        let l = m.add_air_loop(l);

        assert_eq!(m.zone_spaces(z).len(), 1);
        assert_eq!(m.zone_air_loops(z).len(), 1);
        assert_eq!(m.air_loop_zones(l).unwrap()[0].name, "Z1");
        let space = m.space(s).unwrap();
        assert_eq!(m.space_multiplier(space), 3.0);
        assert_eq!(m.conditioned_floor_area(), 300.0);
    }

    #[test]
    fn test_people_from_space_and_space_type() {
        let mut m = Model::new("b");
        let st = m.add_space_type(SpaceType::new("Office"));
        let mut space = Space::new("S1", 200.0, 600.0);
        space.space_type = Some(st);
        let s = m.add_space(space);
        m.add_load(SpaceLoad::new(
            "st people",
            LoadKind::People,
            LoadHost::SpaceType(st),
            LoadAmount::PerFloorArea(0.05),
        ));
        m.add_load(SpaceLoad::new(
            "extra",
            LoadKind::People,
            LoadHost::Space(s),
            LoadAmount::Absolute(2.0),
        ));
        let space = m.space(s).unwrap();
        assert!((m.space_number_of_people(space) - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_lookup_is_error() {
        let m = Model::new("b");
        assert!(matches!(
            m.air_loop(AirLoopId::new()),
            Err(ModelError::NotFound { kind: "air loop", .. })
        ));
    }
}
