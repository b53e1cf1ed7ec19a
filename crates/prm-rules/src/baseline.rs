//! # Appendix G Baseline System Rules
//!
//! Baseline HVAC system selection (Table G3.1.1-3), heating fuel selection,
//! and the per-zone and per-coil settings the baseline systems use.
//!
//! ## Implements
//!
//! - G3.1.1: system group minimum area, system number by area type, floor
//!   count and conditioned area.
//! - G3.1.1-3: heating fuel by climate zone.
//! - G3.1.2.8: unit heater supply temperature, laboratory supply-to-room ΔT.
//! - G3.1.3.2 preheat coil setpoint.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use prm_core::units::{c_to_f, f_to_c, ft2_to_m2};
use prm_core::{ClimateZone, CustomProgram, PrmError, ThermalZoneId};
use prm_model::{
    DesignDay, HeatingCoil, HeatingCoilKind, Model, Schedule, SetpointManagerScheduled, Space,
    ZoneEquipment,
};
use prm_standards::PrototypeRegistry;

use crate::error::RuleResult;
use crate::ruleset::RuleSet;

// ─── Classifications ────────────────────────────────────────────────────────

/// Baseline HVAC area type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaType {
    Residential,
    Nonresidential,
    HeatedOnly,
    Retail,
}

impl AreaType {
    pub fn all() -> &'static [AreaType] {
        &[Self::Residential, Self::Nonresidential, Self::HeatedOnly, Self::Retail]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Nonresidential => "nonresidential",
            Self::HeatedOnly => "heatedonly",
            Self::Retail => "retail",
        }
    }
}

impl std::fmt::Display for AreaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AreaType {
    type Err = PrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PrmError::InvalidValue {
                field: "area_type",
                value: s.to_string(),
            })
    }
}

/// Heating source of a baseline system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatingFuel {
    Electric,
    Fossil,
    /// Purchased heat or purchased heat and cooling.
    Purchased,
}

impl HeatingFuel {
    pub fn all() -> &'static [HeatingFuel] {
        &[Self::Electric, Self::Fossil, Self::Purchased]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electric => "electric",
            Self::Fossil => "fossil",
            Self::Purchased => "purchased",
        }
    }
}

impl std::fmt::Display for HeatingFuel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeatingFuel {
    type Err = PrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PrmError::InvalidValue {
                field: "fuel",
                value: s.to_string(),
            })
    }
}

/// Baseline system pair from Table G3.1.1-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BaselineSystemNumber {
    #[serde(rename = "1_or_2")]
    Sys1Or2,
    #[serde(rename = "3_or_4")]
    Sys3Or4,
    #[serde(rename = "5_or_6")]
    Sys5Or6,
    #[serde(rename = "7_or_8")]
    Sys7Or8,
    #[serde(rename = "9_or_10")]
    Sys9Or10,
}

impl BaselineSystemNumber {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sys1Or2 => "1_or_2",
            Self::Sys3Or4 => "3_or_4",
            Self::Sys5Or6 => "5_or_6",
            Self::Sys7Or8 => "7_or_8",
            Self::Sys9Or10 => "9_or_10",
        }
    }
}

impl std::fmt::Display for BaselineSystemNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preheat setpoint written to a coil outlet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreheatSetpoint {
    pub schedule_name: String,
    pub manager_name: String,
    pub node: String,
    /// °C.
    pub setpoint_c: f64,
}

// ─── Rules ──────────────────────────────────────────────────────────────────

impl RuleSet<'_> {
    /// Area above which a non-predominant area type gets its own system, m².
    pub fn baseline_system_group_minimum_area(&self) -> RuleResult<f64> {
        let table = self.prm_table("baseline_system_group_minimum_area")?;
        let area_ft2 = match self.config().custom {
            Some(CustomProgram::XcelEnergyCoEda) => {
                tracing::info!(
                    area_ft2 = table.xcel_group_minimum_area,
                    "Xcel EDA: reduced minimum area for non-predominant conditions"
                );
                table.xcel_group_minimum_area
            }
            None => table.group_minimum_area,
        };
        Ok(ft2_to_m2(area_ft2))
    }

    /// Baseline system pair for an area type. `None` when no row of the
    /// table applies.
    pub fn baseline_system_number(
        &self,
        area_type: AreaType,
        area_ft2: f64,
        num_stories: u32,
    ) -> RuleResult<Option<BaselineSystemNumber>> {
        let table = self.prm_table("baseline_system_number")?;
        if self.config().custom == Some(CustomProgram::XcelEnergyCoEda) {
            tracing::info!("Xcel EDA: 90.1-2010 system type lookup applies");
        }
        let small = table.small_system_area_limit;
        let large = table.large_system_area_limit;

        let number = match area_type {
            AreaType::Residential => Some(BaselineSystemNumber::Sys1Or2),
            AreaType::Nonresidential => {
                if num_stories <= 3 && area_ft2 < small {
                    Some(BaselineSystemNumber::Sys3Or4)
                } else if ((4..=5).contains(&num_stories) && area_ft2 < small)
                    || (num_stories <= 5 && (small..=large).contains(&area_ft2))
                {
                    Some(BaselineSystemNumber::Sys5Or6)
                } else if num_stories >= 5 || area_ft2 > large {
                    Some(BaselineSystemNumber::Sys7Or8)
                } else {
                    None
                }
            }
            AreaType::HeatedOnly => Some(BaselineSystemNumber::Sys9Or10),
            AreaType::Retail => Some(BaselineSystemNumber::Sys3Or4),
        };
        tracing::debug!(
            area_type = %area_type,
            area_ft2,
            num_stories,
            system = ?number,
            "baseline system number"
        );
        Ok(number)
    }

    /// Heating fuel of the baseline system. Electric and fossil proposals
    /// are replaced by the climate-zone fuel; purchased heat is kept.
    pub fn baseline_system_change_fuel_type(
        &self,
        fuel: HeatingFuel,
        climate_zone: &ClimateZone,
    ) -> RuleResult<HeatingFuel> {
        let table = self.prm_table("baseline_system_change_fuel_type")?;
        if self.config().custom == Some(CustomProgram::XcelEnergyCoEda) {
            tracing::info!("Xcel EDA: heating fuel follows the proposed model");
            return Ok(fuel);
        }
        match fuel {
            HeatingFuel::Electric | HeatingFuel::Fossil => {
                let changed = if climate_zone.is_one_of(table.electric_heating_zones) {
                    HeatingFuel::Electric
                } else {
                    HeatingFuel::Fossil
                };
                tracing::info!(climate_zone = %climate_zone, fuel = %changed, "baseline heating fuel");
                Ok(changed)
            }
            HeatingFuel::Purchased => Ok(fuel),
        }
    }

    pub fn baseline_system_vav_fan_type(&self) -> RuleResult<&'static str> {
        Ok(self.prm_table("baseline_system_vav_fan_type")?.vav_fan_type)
    }

    /// Percent.
    pub fn skylight_to_roof_ratio_limit(&self) -> RuleResult<f64> {
        Ok(self.prm_table("skylight_to_roof_ratio_limit")?.skylight_to_roof_ratio_limit)
    }

    pub fn requires_proposed_model_sizing_run(&self) -> RuleResult<bool> {
        Ok(self
            .prm_table("requires_proposed_model_sizing_run")?
            .requires_proposed_model_sizing_run)
    }

    /// Whether supply, return, and relief fan power are reported separately.
    pub fn fan_power_breakdown(&self) -> RuleResult<bool> {
        Ok(self.prm_table("fan_power_breakdown")?.fan_power_breakdown)
    }

    /// Design supply temperature (°C) of a zone served by a unit heater.
    pub fn unitheater_design_supply_temperature(
        &self,
        model: &Model,
        zone: ThermalZoneId,
    ) -> RuleResult<Option<f64>> {
        let table = self.prm_table("unitheater_design_supply_temperature")?;
        let zone = model.thermal_zone(zone)?;
        Ok(zone
            .equipment
            .contains(&ZoneEquipment::UnitHeater)
            .then(|| f_to_c(table.unit_heater_supply_temperature)))
    }

    /// Supply-to-room ΔT (°F) of a zone containing a laboratory.
    pub fn lab_delta_t(&self, model: &Model, zone: ThermalZoneId) -> RuleResult<Option<f64>> {
        let table = self.prm_table("lab_delta_t")?;
        let has_lab = model.zone_spaces(zone).into_iter().any(|space| {
            model
                .space_type_of(space)
                .and_then(|st| st.standards_space_type.as_deref())
                == Some("laboratory")
        });
        Ok(has_lab.then_some(table.lab_delta_t))
    }

    /// Control a central preheat coil 20 °F below the warmest zone heating
    /// setpoint.
    pub fn set_central_preheat_coil_spm(
        &self,
        model: &mut Model,
        zones: &[ThermalZoneId],
        coil: &HeatingCoil,
    ) -> RuleResult<PreheatSetpoint> {
        let table = self.prm_table("set_central_preheat_coil_spm")?;

        let mut max_heat_setpoint: f64 = 0.0;
        for &zone_id in zones {
            let zone = model.thermal_zone(zone_id)?;
            let Some(schedule_id) = zone.heating_setpoint_schedule else {
                continue;
            };
            let schedule = model.schedule(schedule_id)?;
            if let Some((_, max)) = schedule.design_day_min_max(DesignDay::Heating) {
                max_heat_setpoint = max_heat_setpoint.max(max);
            }
        }
        if max_heat_setpoint == 0.0 {
            max_heat_setpoint = table.default_heating_setpoint;
        }

        let preheat_f = c_to_f(max_heat_setpoint) - table.preheat_offset;
        let setpoint_c = f_to_c(preheat_f);
        let schedule_name = format!("{} Setpoint Temp - {}F", coil.name, preheat_f.round());
        let schedule_id =
            model.upsert_schedule(Schedule::constant_ruleset(schedule_name.clone(), setpoint_c));

        if coil.kind == HeatingCoilKind::Gas {
            tracing::warn!(
                coil = %coil.name,
                "preheat coils in baseline systems shall only be electric or hydronic"
            );
        }
        let manager_name = format!("{} Preheat Coil Setpoint Manager", coil.name);
        model.upsert_setpoint_manager(SetpointManagerScheduled {
            name: manager_name.clone(),
            schedule: schedule_id,
            node: coil.outlet_node.clone(),
        });
        tracing::info!(coil = %coil.name, setpoint_c, "set preheat coil setpoint");

        Ok(PreheatSetpoint {
            schedule_name,
            manager_name,
            node: coil.outlet_node.clone(),
            setpoint_c,
        })
    }
}

/// Whether the space's standards space type is residential in the space
/// type table. `None` when the space has no standards classification or the
/// table has no row for it.
pub fn space_residential(
    rules: &RuleSet<'_>,
    registry: &PrototypeRegistry,
    model: &Model,
    space: &Space,
) -> Option<bool> {
    let space_type = model.space_type_of(space)?;
    let building_type = space_type.standards_building_type.as_deref()?;
    let standards_space_type = space_type.standards_space_type.as_deref()?;
    let residential =
        registry.space_type_is_residential(rules.template(), building_type, standards_space_type);
    if residential.is_none() {
        tracing::debug!(
            space = %space.name,
            building_type,
            space_type = standards_space_type,
            "space type not found in space type table"
        );
    }
    residential
}

#[cfg(test)]
mod tests {
    use super::*;
    use prm_core::{ClimateZoneSet, Template};
    use prm_model::{ScheduleDay, SpaceType, ThermalZone};
    use prm_standards::StandardsData;

    use crate::config::RuleConfig;

    fn cz(code: &str) -> ClimateZone {
        ClimateZone::from_code(ClimateZoneSet::Ashrae169_2013, code).unwrap()
    }

    #[test]
    fn test_group_minimum_area() {
        let data = StandardsData::new();
        let rules = RuleSet::new(RuleConfig::new(Template::Prm2019), &data).unwrap();
        assert!((rules.baseline_system_group_minimum_area().unwrap() - ft2_to_m2(20_000.0)).abs() < 1e-9);
        let xcel = RuleSet::new(
            RuleConfig::new(Template::Prm2019).with_custom(CustomProgram::XcelEnergyCoEda),
            &data,
        )
        .unwrap();
        assert!((xcel.baseline_system_group_minimum_area().unwrap() - ft2_to_m2(5_000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_system_number_table() {
        let data = StandardsData::new();
        let rules = RuleSet::new(RuleConfig::new(Template::Prm2019), &data).unwrap();
        let n = |a, area, stories| rules.baseline_system_number(a, area, stories).unwrap();
        use BaselineSystemNumber::*;
        assert_eq!(n(AreaType::Residential, 1e6, 20), Some(Sys1Or2));
        assert_eq!(n(AreaType::Nonresidential, 20_000.0, 3), Some(Sys3Or4));
        assert_eq!(n(AreaType::Nonresidential, 20_000.0, 4), Some(Sys5Or6));
        assert_eq!(n(AreaType::Nonresidential, 100_000.0, 2), Some(Sys5Or6));
        assert_eq!(n(AreaType::Nonresidential, 150_000.0, 5), Some(Sys5Or6));
        assert_eq!(n(AreaType::Nonresidential, 150_001.0, 2), Some(Sys7Or8));
        assert_eq!(n(AreaType::Nonresidential, 10_000.0, 6), Some(Sys7Or8));
        assert_eq!(n(AreaType::HeatedOnly, 10_000.0, 1), Some(Sys9Or10));
        assert_eq!(n(AreaType::Retail, 10_000.0, 1), Some(Sys3Or4));
    }

    #[test]
    fn test_change_fuel_type() {
        let data = StandardsData::new();
        let rules = RuleSet::new(RuleConfig::new(Template::Prm2019), &data).unwrap();
        assert_eq!(
            rules.baseline_system_change_fuel_type(HeatingFuel::Fossil, &cz("2A")).unwrap(),
            HeatingFuel::Electric
        );
        assert_eq!(
            rules.baseline_system_change_fuel_type(HeatingFuel::Electric, &cz("5A")).unwrap(),
            HeatingFuel::Fossil
        );
        assert_eq!(
            rules.baseline_system_change_fuel_type(HeatingFuel::Purchased, &cz("2A")).unwrap(),
            HeatingFuel::Purchased
        );
        let xcel = RuleSet::new(
            RuleConfig::new(Template::Prm2019).with_custom(CustomProgram::XcelEnergyCoEda),
            &data,
        )
        .unwrap();
        assert_eq!(
            xcel.baseline_system_change_fuel_type(HeatingFuel::Electric, &cz("5A")).unwrap(),
            HeatingFuel::Electric
        );
    }

    #[test]
    fn test_constants() {
        let data = StandardsData::new();
        let rules = RuleSet::new(RuleConfig::new(Template::Prm2019), &data).unwrap();
        assert_eq!(rules.baseline_system_vav_fan_type().unwrap(), "Variable Speed Fan");
        assert_eq!(rules.skylight_to_roof_ratio_limit().unwrap(), 3.0);
        assert!(rules.requires_proposed_model_sizing_run().unwrap());
        assert!(rules.fan_power_breakdown().unwrap());

        let non_prm = RuleSet::new(RuleConfig::new(Template::Ashrae2019), &data).unwrap();
        assert!(non_prm.skylight_to_roof_ratio_limit().is_err());
    }

    #[test]
    fn test_area_type_parse() {
        assert_eq!("HeatedOnly".parse::<AreaType>().unwrap(), AreaType::HeatedOnly);
        assert!("industrial".parse::<AreaType>().is_err());
        assert_eq!("fossil".parse::<HeatingFuel>().unwrap(), HeatingFuel::Fossil);
    }

    #[test]
    fn test_zone_settings() {
        let data = StandardsData::new();
        let rules = RuleSet::new(RuleConfig::new(Template::Prm2019), &data).unwrap();
        let mut model = Model::new("B");
        let mut zone = ThermalZone::new("Lab Zone");
        zone.equipment.push(ZoneEquipment::UnitHeater);
        let zid = model.add_thermal_zone(zone);
        let mut st = SpaceType::new("Lab");
        st.standards_space_type = Some("laboratory".into());
        let st_id = model.add_space_type(st);
        let mut space = Space::new("Lab 1", 50.0, 150.0);
        space.space_type = Some(st_id);
        space.thermal_zone = Some(zid);
        model.add_space(space);

        let t = rules.unitheater_design_supply_temperature(&model, zid).unwrap().unwrap();
        assert!((t - f_to_c(105.0)).abs() < 1e-9);
        assert_eq!(rules.lab_delta_t(&model, zid).unwrap(), Some(17.0));

        let other = model.add_thermal_zone(ThermalZone::new("Office"));
        assert_eq!(rules.unitheater_design_supply_temperature(&model, other).unwrap(), None);
        assert_eq!(rules.lab_delta_t(&model, other).unwrap(), None);
    }

    #[test]
    fn test_preheat_setpoint() {
        let data = StandardsData::new();
        let rules = RuleSet::new(RuleConfig::new(Template::Prm2019), &data).unwrap();
        let mut model = Model::new("B");
        let mut sched = Schedule::ruleset("Htg SP", ScheduleDay::constant("Htg Default", 21.0));
        if let Some(rs) = sched.as_ruleset_mut() {
            rs.winter_design_day = Some(ScheduleDay::constant("Htg WDD", 21.1));
        }
        let sid = model.add_schedule(sched).unwrap();
        let mut zone = ThermalZone::new("Z");
        zone.heating_setpoint_schedule = Some(sid);
        let zid = model.add_thermal_zone(zone);
        let coil = HeatingCoil {
            name: "Preheat Coil".into(),
            kind: HeatingCoilKind::Water,
            outlet_node: "Preheat Coil Outlet".into(),
        };

        let sp = rules.set_central_preheat_coil_spm(&mut model, &[zid], &coil).unwrap();
        let expected_f = c_to_f(21.1) - 20.0;
        assert!((sp.setpoint_c - f_to_c(expected_f)).abs() < 1e-9);
        assert_eq!(sp.schedule_name, "Preheat Coil Setpoint Temp - 50F");
        assert_eq!(sp.manager_name, "Preheat Coil Preheat Coil Setpoint Manager");
        assert_eq!(model.setpoint_managers.len(), 1);

        rules.set_central_preheat_coil_spm(&mut model, &[zid], &coil).unwrap();
        assert_eq!(model.setpoint_managers.len(), 1);
    }

    #[test]
    fn test_preheat_default_setpoint() {
        let data = StandardsData::new();
        let rules = RuleSet::new(RuleConfig::new(Template::Prm2019), &data).unwrap();
        let mut model = Model::new("B");
        let coil = HeatingCoil {
            name: "PH".into(),
            kind: HeatingCoilKind::Gas,
            outlet_node: "PH Outlet".into(),
        };
        let sp = rules.set_central_preheat_coil_spm(&mut model, &[], &coil).unwrap();
        assert!((sp.setpoint_c - f_to_c(c_to_f(22.2) - 20.0)).abs() < 1e-9);
    }

    #[test]
    fn test_space_residential() {
        let data = StandardsData::bundled().unwrap();
        let registry = PrototypeRegistry::from_data(&data).unwrap();
        let rules = RuleSet::new(RuleConfig::new(Template::Ashrae2019), &data).unwrap();
        let mut model = Model::new("B");
        let mut st = SpaceType::new("Apt");
        st.standards_building_type = Some("MidriseApartment".into());
        st.standards_space_type = Some("Apartment".into());
        let st_id = model.add_space_type(st);
        let mut space = Space::new("Unit 1", 80.0, 240.0);
        space.space_type = Some(st_id);
        assert_eq!(space_residential(&rules, &registry, &model, &space), Some(true));
        space.space_type = None;
        assert_eq!(space_residential(&rules, &registry, &model, &space), None);
    }
}
