//! # Air-Loop Requirements
//!
//! Economizer, demand-control-ventilation, outdoor-damper, staging, supply
//! air temperature reset, and energy recovery requirements for one air loop.
//!
//! ## Design
//!
//! Requirement checks read the loop and never change it. The two rules that
//! rewrite controls, [`RuleSet::apply_economizer_limits`] and
//! [`enable_demand_control_ventilation`], take `&mut AirLoop`.
//!
//! A loop without an outdoor-air system has no economizer and no intake:
//! checks that need one answer "not required" (or "allowable") and log why.

use serde::Serialize;

use prm_core::units::{c_to_f, f_to_c, m3_per_s_to_cfm, w_to_btu_per_hr};
use prm_core::ClimateZone;
use prm_model::{AirLoop, EconomizerType, Model, ScheduleKind, SystemOutdoorAirMethod};
use prm_standards::SearchCriteria;

use crate::error::RuleResult;
use crate::ruleset::RuleSet;

/// J/kg per Btu/lb.
const J_PER_KG_PER_BTU_PER_LB: f64 = 2326.0;

/// Hours in a non-leap year.
const HOURS_PER_YEAR: f64 = 8760.0;

/// Economizer high limits. `None` means the control type has no such limit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EconomizerLimits {
    /// °F.
    pub drybulb_f: Option<f64>,
    /// Btu/lb.
    pub enthalpy_btu_per_lb: Option<f64>,
    /// °F.
    pub dewpoint_f: Option<f64>,
}

impl EconomizerLimits {
    /// `[drybulb, enthalpy, dewpoint]`.
    pub fn as_array(&self) -> [Option<f64>; 3] {
        [self.drybulb_f, self.enthalpy_btu_per_lb, self.dewpoint_f]
    }

    pub fn is_empty(&self) -> bool {
        self.as_array().iter().all(Option::is_none)
    }
}

/// Outdoor airflow above which DCV is required.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DcvLimits {
    /// cfm.
    pub min_oa_without_economizer: f64,
    /// cfm.
    pub min_oa_with_economizer: f64,
}

/// Limits governing whether a motorized outdoor-air damper is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MotorizedDamperLimits {
    /// cfm.
    pub minimum_oa_flow_cfm: u32,
    pub maximum_stories: u32,
}

// ─── Loop inspection ────────────────────────────────────────────────────────

/// Whether the loop serves more than one zone with variable-volume control.
pub fn multizone_vav_system(air_loop: &AirLoop) -> bool {
    if air_loop.branches.len() <= 1 {
        return false;
    }
    air_loop.branches.iter().any(|b| b.terminal.kind.is_vav()) || air_loop.has_variable_volume_fan()
}

/// Sum of cooling coil capacities on the loop, W. Coils without a rated or
/// autosized capacity contribute nothing.
pub fn total_cooling_capacity(air_loop: &AirLoop) -> f64 {
    let mut total = 0.0;
    for coil in air_loop.cooling_coils() {
        match coil.capacity() {
            Some(w) => total += w,
            None => tracing::warn!(
                air_loop = %air_loop.name,
                coil = %coil.name,
                "cooling coil capacity not available, excluded from total"
            ),
        }
    }
    total
}

pub fn include_cooling_coil(air_loop: &AirLoop) -> bool {
    air_loop.cooling_coils().next().is_some()
}

pub fn include_evaporative_cooler(air_loop: &AirLoop) -> bool {
    air_loop.has_evaporative_cooler()
}

/// Whether the loop's outdoor-air controller economizes.
pub fn include_economizer(air_loop: &AirLoop) -> bool {
    air_loop
        .controller_oa()
        .map_or(false, |c| c.economizer_type != EconomizerType::NoEconomizer)
}

/// Turn on demand control ventilation. Returns `false` when the loop has no
/// outdoor-air system.
pub fn enable_demand_control_ventilation(air_loop: &mut AirLoop) -> bool {
    let name = air_loop.name.clone();
    let Some(controller) = air_loop.controller_oa_mut() else {
        tracing::warn!(air_loop = %name, "no outdoor air system, cannot enable DCV");
        return false;
    };
    controller.mechanical_ventilation.demand_controlled_ventilation = true;
    controller.mechanical_ventilation.system_outdoor_air_method = SystemOutdoorAirMethod::ZoneSum;
    tracing::info!(air_loop = %name, "enabled demand control ventilation");
    true
}

/// ERV table column for an outdoor-air fraction. `None` below 10 %.
pub fn erv_oa_fraction_band(pct_oa: f64) -> Option<&'static str> {
    let band = match pct_oa {
        p if p < 0.1 => return None,
        p if p < 0.2 => "10_to_20_percent_oa",
        p if p < 0.3 => "20_to_30_percent_oa",
        p if p < 0.4 => "30_to_40_percent_oa",
        p if p < 0.5 => "40_to_50_percent_oa",
        p if p < 0.6 => "50_to_60_percent_oa",
        p if p < 0.7 => "60_to_70_percent_oa",
        p if p < 0.8 => "70_to_80_percent_oa",
        _ => "greater_than_80_percent_oa",
    };
    Some(band)
}

/// Annual hours the loop is available. Only always-on and ruleset schedules
/// can be evaluated; anything else is reported as 0 h with a warning.
pub fn annual_operating_hours(model: &Model, air_loop: &AirLoop) -> RuleResult<f64> {
    let Some(schedule_id) = air_loop.availability_schedule else {
        return Ok(HOURS_PER_YEAR);
    };
    if model.always_on_discrete_schedule() == Some(schedule_id) {
        return Ok(HOURS_PER_YEAR);
    }
    let schedule = model.schedule(schedule_id)?;
    match schedule.kind {
        ScheduleKind::Ruleset(_) => Ok(schedule.annual_hours_above(0.0)),
        _ => {
            tracing::warn!(
                air_loop = %air_loop.name,
                schedule = %schedule.name,
                "could not determine annual operating hours, assuming fewer than 8000"
            );
            Ok(0.0)
        }
    }
}

// ─── Rules ──────────────────────────────────────────────────────────────────

impl RuleSet<'_> {
    /// Economizer high limits for the loop's control type.
    pub fn economizer_limits(
        &self,
        air_loop: &AirLoop,
        climate_zone: &ClimateZone,
    ) -> RuleResult<EconomizerLimits> {
        let table = self.air_loop_table("economizer_limits")?;
        let Some(controller) = air_loop.controller_oa() else {
            return Ok(EconomizerLimits::default());
        };

        let mut limits = EconomizerLimits::default();
        match controller.economizer_type {
            EconomizerType::NoEconomizer => {
                tracing::debug!(air_loop = %air_loop.name, "no economizer");
                return Ok(limits);
            }
            EconomizerType::FixedDryBulb => {
                let criteria = SearchCriteria::new()
                    .with("template", self.template().as_str())
                    .with("climate_zone", climate_zone.to_string());
                limits.drybulb_f = self
                    .standards()
                    .find_object("economizers", &criteria)
                    .and_then(|row| row.get("fixed_dry_bulb_high_limit_shutoff_temp"))
                    .and_then(|v| v.as_f64());
                if limits.drybulb_f.is_none() {
                    tracing::warn!(
                        air_loop = %air_loop.name,
                        template = %self.template(),
                        climate_zone = %climate_zone,
                        "no fixed dry-bulb economizer limit found"
                    );
                }
            }
            EconomizerType::FixedEnthalpy => {
                limits.enthalpy_btu_per_lb = Some(table.fixed_enthalpy_limit);
            }
            EconomizerType::FixedDewPointAndDryBulb => {
                limits.drybulb_f = Some(table.fixed_dew_point_dry_bulb_limit);
                limits.dewpoint_f = Some(table.fixed_dew_point_limit);
            }
            other => {
                tracing::debug!(air_loop = %air_loop.name, economizer = %other, "no limits defined");
            }
        }

        tracing::info!(
            air_loop = %air_loop.name,
            economizer = %controller.economizer_type,
            limits = ?limits.as_array(),
            "economizer limits"
        );
        Ok(limits)
    }

    /// Write the economizer limits into the loop's controller. The minimum
    /// dry-bulb limit is always cleared.
    pub fn apply_economizer_limits(
        &self,
        air_loop: &mut AirLoop,
        climate_zone: &ClimateZone,
    ) -> RuleResult<EconomizerLimits> {
        let limits = self.economizer_limits(air_loop, climate_zone)?;
        if let Some(controller) = air_loop.controller_oa_mut() {
            controller.economizer_minimum_limit_dry_bulb = None;
            controller.economizer_maximum_limit_dry_bulb = limits.drybulb_f.map(f_to_c);
            controller.economizer_maximum_limit_enthalpy =
                limits.enthalpy_btu_per_lb.map(|h| h * J_PER_KG_PER_BTU_PER_LB);
            controller.economizer_maximum_limit_dewpoint = limits.dewpoint_f.map(f_to_c);
        }
        Ok(limits)
    }

    pub fn integrated_economizer_required(&self) -> RuleResult<bool> {
        Ok(self
            .air_loop_table("integrated_economizer_required")?
            .integrated_economizer_required)
    }

    /// Economizer types the edition prohibits in `climate_zone`.
    pub fn prohibited_economizer_types(
        &self,
        climate_zone: &ClimateZone,
    ) -> RuleResult<&'static [EconomizerType]> {
        let table = self.air_loop_table("economizer_type_allowable")?;
        Ok(table
            .economizer_prohibitions
            .iter()
            .find(|p| climate_zone.is_one_of(p.climate_zones))
            .map_or(&[][..], |p| p.prohibited))
    }

    /// Whether the loop's economizer type is permitted. Loops without an
    /// outdoor-air system or economizer are always allowable.
    pub fn economizer_type_allowable(
        &self,
        air_loop: &AirLoop,
        climate_zone: &ClimateZone,
    ) -> RuleResult<bool> {
        let prohibited = self.prohibited_economizer_types(climate_zone)?;
        let Some(controller) = air_loop.controller_oa() else {
            return Ok(true);
        };
        if controller.economizer_type == EconomizerType::NoEconomizer {
            return Ok(true);
        }
        Ok(!prohibited.contains(&controller.economizer_type))
    }

    pub fn multizone_vav_optimization_required(
        &self,
        air_loop: &AirLoop,
        _climate_zone: &ClimateZone,
    ) -> RuleResult<bool> {
        let table = self.air_loop_table("multizone_vav_optimization_required")?;

        let fan_powered = air_loop
            .branches
            .iter()
            .filter(|b| b.terminal.kind.is_fan_powered())
            .count();
        if fan_powered > 0 {
            tracing::info!(
                air_loop = %air_loop.name,
                fan_powered,
                "multizone VAV optimization not required with fan-powered terminals"
            );
            return Ok(false);
        }

        let Some(controller) = air_loop.controller_oa() else {
            tracing::info!(air_loop = %air_loop.name, "multizone optimization not applicable without OA intake");
            return Ok(false);
        };
        let Some(design_flow) = air_loop.design_supply_air_flow() else {
            tracing::warn!(air_loop = %air_loop.name, "design supply air flow rate not available");
            return Ok(false);
        };
        let Some(min_oa) = controller.minimum_outdoor_air_flow() else {
            tracing::warn!(controller = %controller.name, "minimum OA flow rate not available");
            return Ok(false);
        };

        let pct_oa = min_oa / design_flow;
        if pct_oa > table.vav_optimization_max_oa_fraction {
            tracing::info!(
                controller = %controller.name,
                pct_oa,
                "multizone optimization not applicable above 70% OA"
            );
            return Ok(false);
        }
        Ok(true)
    }

    pub fn demand_control_ventilation_limits(&self, _air_loop: &AirLoop) -> RuleResult<DcvLimits> {
        let table = self.air_loop_table("demand_control_ventilation_limits")?;
        Ok(DcvLimits {
            min_oa_without_economizer: table.dcv_min_oa_without_economizer,
            min_oa_with_economizer: table.dcv_min_oa_with_economizer,
        })
    }

    /// Whether the loop's outdoor airflow exceeds the DCV limit that applies
    /// to it (the lower limit when it economizes).
    pub fn demand_control_ventilation_required(
        &self,
        air_loop: &AirLoop,
        _climate_zone: &ClimateZone,
    ) -> RuleResult<bool> {
        let limits = self.demand_control_ventilation_limits(air_loop)?;
        let Some(controller) = air_loop.controller_oa() else {
            tracing::info!(air_loop = %air_loop.name, "DCV not required without OA intake");
            return Ok(false);
        };
        let Some(min_oa) = controller.minimum_outdoor_air_flow() else {
            tracing::warn!(controller = %controller.name, "minimum OA flow rate not available, DCV not required");
            return Ok(false);
        };

        let limit_cfm = if include_economizer(air_loop) {
            limits.min_oa_with_economizer
        } else {
            limits.min_oa_without_economizer
        };
        let oa_cfm = m3_per_s_to_cfm(min_oa);
        let required = oa_cfm > limit_cfm;
        tracing::debug!(
            air_loop = %air_loop.name,
            oa_cfm = oa_cfm.round(),
            limit_cfm,
            required,
            "DCV requirement"
        );
        Ok(required)
    }

    pub fn motorized_oa_damper_limits(
        &self,
        _air_loop: &AirLoop,
        climate_zone: &ClimateZone,
    ) -> RuleResult<MotorizedDamperLimits> {
        let table = self.air_loop_table("motorized_oa_damper_limits")?;
        let maximum_stories = if climate_zone.is_one_of(table.motorized_damper_exempt_zones) {
            999
        } else {
            0
        };
        Ok(MotorizedDamperLimits {
            minimum_oa_flow_cfm: 0,
            maximum_stories,
        })
    }

    /// Number of cooling stages required of a single-zone DX system.
    pub fn single_zone_controls_num_stages(
        &self,
        air_loop: &AirLoop,
        _climate_zone: &ClimateZone,
    ) -> RuleResult<u8> {
        let table = self.air_loop_table("single_zone_controls_num_stages")?;
        let capacity = w_to_btu_per_hr(total_cooling_capacity(air_loop));
        let stages = if capacity >= table.two_stage_min_cooling_capacity {
            2
        } else {
            1
        };
        tracing::info!(
            air_loop = %air_loop.name,
            capacity_btu_per_hr = capacity.round(),
            stages,
            "single-zone control stages"
        );
        Ok(stages)
    }

    pub fn supply_air_temperature_reset_required(
        &self,
        air_loop: &AirLoop,
        climate_zone: &ClimateZone,
    ) -> RuleResult<bool> {
        let table = self.air_loop_table("supply_air_temperature_reset_required")?;
        if !multizone_vav_system(air_loop) {
            return Ok(false);
        }
        if climate_zone.is_one_of(table.sat_reset_exempt_zones) {
            tracing::info!(
                air_loop = %air_loop.name,
                climate_zone = %climate_zone,
                "SAT reset not required in this climate zone"
            );
            return Ok(false);
        }
        Ok(true)
    }

    /// Outdoor airflow (cfm) above which an ERV is required. `None` when
    /// recovery is never required for this loop.
    pub fn energy_recovery_ventilator_flow_limit(
        &self,
        model: &Model,
        air_loop: &AirLoop,
        climate_zone: &ClimateZone,
        pct_oa: f64,
    ) -> RuleResult<Option<f64>> {
        let table = self.air_loop_table("energy_recovery_ventilator_flow_limit")?;
        let hours = annual_operating_hours(model, air_loop)?;
        let under_8000 = hours < table.erv_operating_hours_threshold;

        let criteria = SearchCriteria::new()
            .with("template", self.template().as_str())
            .with("climate_zone", climate_zone.to_string())
            .with("under_8000_hours", under_8000);
        let Some(row) = self.standards().find_object("energy_recovery", &criteria) else {
            tracing::warn!(
                template = %self.template(),
                climate_zone = %climate_zone,
                under_8000_hours = under_8000,
                "no energy recovery limits found, assuming no energy recovery required"
            );
            return Ok(None);
        };

        Ok(erv_oa_fraction_band(pct_oa)
            .and_then(|band| row.get(band))
            .and_then(|v| v.as_f64()))
    }
}

/// Dry-bulb limit in °F currently written on the loop's controller.
pub fn controller_drybulb_limit_f(air_loop: &AirLoop) -> Option<f64> {
    air_loop
        .controller_oa()
        .and_then(|c| c.economizer_maximum_limit_dry_bulb)
        .map(c_to_f)
}
