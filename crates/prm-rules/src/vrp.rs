//! # Ventilation Rate Procedure — Baseline VAV Damper Minimums
//!
//! Sets the minimum damper position of every VAV terminal on a baseline
//! multizone loop so each zone receives its outdoor air at the system OA
//! fraction, then caps the loop's outdoor-air fraction at simulation time
//! with EMS so the intake never drops below the VRP system requirement.
//!
//! ## Design
//!
//! All quantities are computed from `&Model` first; the mutation step then
//! writes dampers, the max-OA-fraction schedule, EMS objects, and the sizing
//! system in one pass. EMS objects are keyed by name, so running the
//! adjustment again replaces them instead of adding duplicates.

use serde::Serialize;

use prm_core::{AirLoopId, ThermalZoneId};
use prm_model::{
    EmsActuator, EmsProgram, EmsProgramCallingManager, EmsSensor, Model, Schedule,
    SystemOutdoorAirMethod,
};
use prm_standards::BuildingType;

use crate::error::{RuleError, RuleResult};
use crate::ruleset::RuleSet;
use crate::ventilation::zone_outdoor_airflow_rate;

/// Hospital loops that keep their prototype damper minimums.
const HOSPITAL_EXEMPT_LOOPS: &[&str] = &["VAV_ER", "VAV_ICU", "VAV_OR", "VAV_LABS", "VAV_PATRMS"];

/// Outpatient loop that keeps its prototype damper minimums.
const OUTPATIENT_EXEMPT_LOOP: &str = "Outpatient F1";

const CALLING_POINT: &str = "InsideHVACSystemIterationLoop";

/// Damper minimum written for one zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneDamperPosition {
    pub zone: ThermalZoneId,
    pub zone_name: String,
    /// Zone outdoor airflow, m³/s.
    pub v_oz: f64,
    /// Zone primary airflow per multiplied zone, m³/s.
    pub v_pz: f64,
    pub minimum_damper_position: f64,
    /// Whether the computed position fell outside [0, 1].
    pub clamped: bool,
}

/// Result of a VRP adjustment on one loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VrpAdjustment {
    pub air_loop: String,
    /// Uncorrected outdoor air intake, m³/s.
    pub v_ou: f64,
    /// System ventilation efficiency.
    pub e_v: f64,
    /// Outdoor air intake, m³/s.
    pub v_ot: f64,
    pub zones: Vec<ZoneDamperPosition>,
    /// Zones without primary airflow; their dampers were not changed.
    pub skipped_zones: Vec<String>,
}

/// EMS names for one loop.
#[derive(Debug)]
struct EmsNames {
    oa_vrp: String,
    oa: String,
    supply_flow: String,
    actuator: String,
    program: String,
    calling_manager: String,
}

impl EmsNames {
    fn for_loop(loop_name: &str) -> Self {
        let base = loop_name.replace(' ', "_");
        let ems = format!("EMS_{base}");
        Self {
            oa_vrp: format!("{ems}_OA_VRP"),
            oa: format!("{ems}_OA"),
            supply_flow: format!("{ems}_SUPPLY_FLOW"),
            actuator: format!("{ems}_MAX_OA_FRAC"),
            program: format!("{base}_MAX_OA_FRAC"),
            calling_manager: format!("SET_{base}_MAX_OA_FRAC"),
        }
    }

    fn program_lines(&self, v_ot: f64) -> Vec<String> {
        vec![
            format!("IF {} > {},", self.oa, self.oa_vrp),
            format!("SET {} = NULL,", self.actuator),
            "ELSE,".to_string(),
            format!("IF {} > 0,", self.supply_flow),
            format!("SET {} = {} / {},", self.actuator, v_ot, self.supply_flow),
            "ELSE,".to_string(),
            format!("SET {} = NULL,", self.actuator),
            "ENDIF,".to_string(),
            "ENDIF".to_string(),
        ]
    }
}

/// System ventilation efficiency for occupant diversity `d`.
pub fn system_ventilation_efficiency(d: f64) -> f64 {
    if d < 0.6 {
        0.88 * d + 0.22
    } else {
        0.75
    }
}

fn is_exempt(building_type: Option<BuildingType>, loop_name: &str) -> bool {
    match building_type {
        Some(BuildingType::Hospital) => HOSPITAL_EXEMPT_LOOPS.iter().any(|n| loop_name.contains(n)),
        Some(BuildingType::Outpatient) => loop_name.contains(OUTPATIENT_EXEMPT_LOOP),
        _ => false,
    }
}

impl RuleSet<'_> {
    /// Apply the ventilation rate procedure to a baseline VAV loop.
    ///
    /// Returns `Ok(None)` for loops the prototype keeps unchanged.
    ///
    /// A zone without primary airflow keeps its damper position and is
    /// listed in `skipped_zones`. Its outdoor air still counts toward `v_ou`,
    /// since the system intake has to serve it either way.
    pub fn adjust_minimum_vav_damper_positions(
        &self,
        model: &mut Model,
        air_loop_id: AirLoopId,
    ) -> RuleResult<Option<VrpAdjustment>> {
        let table = self.air_loop_table("adjust_minimum_vav_damper_positions")?;
        let air_loop = model.air_loop(air_loop_id)?;
        let loop_name = air_loop.name.clone();

        if is_exempt(self.config().building_type, &loop_name) {
            tracing::info!(air_loop = %loop_name, "prototype loop exempt from VRP damper adjustment");
            return Ok(None);
        }
        if air_loop.controller_oa().is_none() {
            return Err(RuleError::MissingOutdoorAirSystem { air_loop: loop_name });
        }

        // ---- Quantities ----

        let zones = model.air_loop_zones(air_loop_id)?;
        let v_ou: f64 = zones
            .iter()
            .map(|z| zone_outdoor_airflow_rate(model, z.id) * f64::from(z.multiplier))
            .sum();

        let mut positions = Vec::new();
        let mut skipped_zones = Vec::new();
        for zone in &zones {
            let v_bz = zone_outdoor_airflow_rate(model, zone.id);
            let e_z = 1.0;
            let v_oz = v_bz / e_z;

            let clg = zone.autosized_cooling_design_air_flow_rate;
            let htg = zone.autosized_heating_design_air_flow_rate;
            if clg.is_none() {
                tracing::warn!(zone = %zone.name, "autosized cooling design air flow rate not available");
            }
            if htg.is_none() {
                tracing::warn!(zone = %zone.name, "autosized heating design air flow rate not available");
            }
            let v_pz = clg.unwrap_or(0.0).max(htg.unwrap_or(0.0)) / f64::from(zone.multiplier.max(1));

            if v_pz <= 0.0 {
                tracing::warn!(
                    air_loop = %loop_name,
                    zone = %zone.name,
                    "zone has no primary air flow, damper position left unchanged"
                );
                skipped_zones.push(zone.name.clone());
                continue;
            }

            let raw = table.vrp_damper_safety_factor * v_oz / v_pz;
            let position = raw.clamp(0.0, 1.0);
            let clamped = position != raw;
            if clamped {
                tracing::warn!(zone = %zone.name, computed = raw, "minimum damper position clamped");
            }
            positions.push(ZoneDamperPosition {
                zone: zone.id,
                zone_name: zone.name.clone(),
                v_oz,
                v_pz,
                minimum_damper_position: position,
                clamped,
            });
        }

        let e_v = system_ventilation_efficiency(table.occupant_diversity);
        let v_ot = v_ou / e_v;
        tracing::info!(air_loop = %loop_name, v_ou, e_v, v_ot, "ventilation rate procedure");

        // ---- Max OA fraction schedule ----

        let existing_schedule = model
            .air_loop(air_loop_id)?
            .controller_oa()
            .and_then(|c| c.maximum_fraction_of_outdoor_air_schedule);
        let schedule_id = match existing_schedule {
            Some(id) => id,
            None => model.upsert_schedule(Schedule::constant(format!("{loop_name}_MAX_OA_FRAC"), 1.0)),
        };
        let component_type = model.schedule(schedule_id)?.idd_type().to_string();

        // ---- Loop writes ----

        let air_loop = model.air_loop_mut(air_loop_id)?;
        for position in &positions {
            for branch in air_loop
                .branches
                .iter_mut()
                .filter(|b| b.zone == position.zone && b.terminal.kind.is_vav())
            {
                branch.terminal.minimum_damper_position = Some(position.minimum_damper_position);
            }
        }
        if let Some(controller) = air_loop.controller_oa_mut() {
            controller.maximum_fraction_of_outdoor_air_schedule = Some(schedule_id);
        }
        air_loop.sizing_system.design_outdoor_air_flow_rate = Some(v_ot);
        air_loop.sizing_system.system_outdoor_air_method = SystemOutdoorAirMethod::ZoneSum;

        // ---- EMS ----

        let names = EmsNames::for_loop(&loop_name);
        let ems = &mut model.ems;
        ems.upsert_sensor(EmsSensor {
            name: names.oa_vrp.clone(),
            output_variable: "Air System Outdoor Air Mechanical Ventilation Requested Mass Flow Rate"
                .into(),
            key_name: loop_name.clone(),
        });
        ems.upsert_sensor(EmsSensor {
            name: names.oa.clone(),
            output_variable: "Air System Outdoor Air Mass Flow Rate".into(),
            key_name: loop_name.clone(),
        });
        ems.upsert_sensor(EmsSensor {
            name: names.supply_flow.clone(),
            output_variable: "System Node Standard Density Volume Flow Rate".into(),
            key_name: format!("{loop_name} Mixed Air Node"),
        });
        ems.upsert_actuator(EmsActuator {
            name: names.actuator.clone(),
            schedule: schedule_id,
            component_type,
            control_type: "Schedule Value".into(),
        });
        ems.upsert_program(EmsProgram {
            name: names.program.clone(),
            lines: names.program_lines(v_ot),
        });
        ems.upsert_calling_manager(EmsProgramCallingManager {
            name: names.calling_manager.clone(),
            calling_point: CALLING_POINT.into(),
            programs: vec![names.program.clone()],
        });

        Ok(Some(VrpAdjustment {
            air_loop: loop_name,
            v_ou,
            e_v,
            v_ot,
            zones: positions,
            skipped_zones,
        }))
    }
}
