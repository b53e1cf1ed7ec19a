//! # Rule Sets — Versioned Rule Tables per Code Edition
//!
//! Every code edition the crate evaluates has one [`EditionProfile`]: the
//! constants and climate-zone lists its rules read. A [`RuleSet`] binds a
//! profile to a [`RuleConfig`] and the standards database, and the rule
//! modules implement their operations as methods on it.
//!
//! ## Design
//!
//! Editions that share a rule share the table: 90.1-2019 and 90.1-PRM-2019
//! point at the same [`AirLoopTable`]. An edition without a table for a
//! rule family reports [`RuleError::UnsupportedTemplate`] when one of those
//! rules is asked for, so a missing rule never silently falls through to
//! another edition's numbers.
//!
//! ## Implements
//!
//! - ASHRAE 90.1-2016: minimum zone ventilation efficiency.
//! - ASHRAE 90.1-2019: air-loop economizer, DCV, damper, staging, SAT reset,
//!   energy recovery, and VRP rules.
//! - ASHRAE 90.1-2019 Appendix G: the 2019 air-loop rules plus the baseline
//!   model rules.

use prm_core::Template;
use prm_model::EconomizerType;
use prm_standards::StandardsData;

use crate::config::RuleConfig;
use crate::error::{RuleError, RuleResult};

// ─── Tables ─────────────────────────────────────────────────────────────────

/// Economizer types prohibited in a set of climate zones.
#[derive(Debug)]
pub struct EconomizerProhibition {
    pub climate_zones: &'static [&'static str],
    pub prohibited: &'static [EconomizerType],
}

/// Constants of the air-loop rules.
#[derive(Debug)]
pub struct AirLoopTable {
    /// Btu/lb.
    pub fixed_enthalpy_limit: f64,
    /// °F.
    pub fixed_dew_point_limit: f64,
    /// °F, dry-bulb limit paired with the dew-point limit.
    pub fixed_dew_point_dry_bulb_limit: f64,
    pub integrated_economizer_required: bool,
    pub economizer_prohibitions: &'static [EconomizerProhibition],
    /// Multizone VAV optimization is not required above this OA fraction.
    pub vav_optimization_max_oa_fraction: f64,
    /// cfm.
    pub dcv_min_oa_without_economizer: f64,
    /// cfm.
    pub dcv_min_oa_with_economizer: f64,
    /// Zones where motorized OA dampers are exempt at any height.
    pub motorized_damper_exempt_zones: &'static [&'static str],
    /// Btu/h.
    pub two_stage_min_cooling_capacity: f64,
    /// Zones where SAT reset is not required.
    pub sat_reset_exempt_zones: &'static [&'static str],
    /// Annual hours of operation separating the ERV tables.
    pub erv_operating_hours_threshold: f64,
    /// Occupant diversity used by the ventilation rate procedure.
    pub occupant_diversity: f64,
    /// Safety factor on the VRP minimum damper position.
    pub vrp_damper_safety_factor: f64,
}

/// Constants of the Appendix G baseline rules.
#[derive(Debug)]
pub struct PrmTable {
    /// ft².
    pub group_minimum_area: f64,
    /// ft², Xcel Energy CO EDA.
    pub xcel_group_minimum_area: f64,
    /// ft², boundary between systems 3/4 and 5/6.
    pub small_system_area_limit: f64,
    /// ft², boundary between systems 5/6 and 7/8.
    pub large_system_area_limit: f64,
    /// Zones where the baseline heats with electricity.
    pub electric_heating_zones: &'static [&'static str],
    pub vav_fan_type: &'static str,
    /// Percent.
    pub skylight_to_roof_ratio_limit: f64,
    pub requires_proposed_model_sizing_run: bool,
    pub fan_power_breakdown: bool,
    /// °F.
    pub unit_heater_supply_temperature: f64,
    /// °F.
    pub lab_delta_t: f64,
    /// °F below the warmest zone heating setpoint.
    pub preheat_offset: f64,
    /// °C, used when no zone heating setpoint is found.
    pub default_heating_setpoint: f64,
    /// cfm/ft² of envelope at 75 Pa.
    pub infiltration_rate_at_75pa: f64,
    /// Converts a 75 Pa rate to typical operating conditions.
    pub infiltration_conversion_factor: f64,
    /// Coefficients used when the model's are missing or inconsistent.
    pub default_infiltration_coefficients: [f64; 4],
    /// cfm; baseline loops at or below this OA flow need no DCV.
    pub baseline_dcv_min_oa: f64,
    /// People per 1000 ft²; baseline zones at or below need no DCV.
    pub baseline_dcv_max_occupancy: f64,
    /// ft²; user-model zones at or below need no DCV.
    pub user_dcv_min_zone_area: f64,
    /// People per 1000 ft²; user-model zones below need no DCV.
    pub user_dcv_min_occupancy: f64,
}

/// The rule tables of one code edition.
#[derive(Debug)]
pub struct EditionProfile {
    pub template: Template,
    pub minimum_zone_ventilation_efficiency: f64,
    pub air_loop: Option<&'static AirLoopTable>,
    pub prm: Option<&'static PrmTable>,
}

const B_ZONES_AND_COLD_MARINE: &[&str] = &[
    "0B", "1B", "2B", "3B", "4B", "5B", "6B", "7B", "8B", "3C", "4C", "7A", "8A",
];

const HOT_HUMID_ZONES: &[&str] = &["0A", "1A", "2A", "3A", "4A"];

static ECONOMIZER_PROHIBITIONS_2019: [EconomizerProhibition; 2] = [
    EconomizerProhibition {
        climate_zones: B_ZONES_AND_COLD_MARINE,
        prohibited: &[EconomizerType::FixedEnthalpy],
    },
    EconomizerProhibition {
        climate_zones: HOT_HUMID_ZONES,
        prohibited: &[EconomizerType::FixedDryBulb, EconomizerType::DifferentialDryBulb],
    },
];

static AIR_LOOP_2019: AirLoopTable = AirLoopTable {
    fixed_enthalpy_limit: 28.0,
    fixed_dew_point_limit: 55.0,
    fixed_dew_point_dry_bulb_limit: 75.0,
    integrated_economizer_required: true,
    economizer_prohibitions: &ECONOMIZER_PROHIBITIONS_2019,
    vav_optimization_max_oa_fraction: 0.7,
    dcv_min_oa_without_economizer: 3000.0,
    dcv_min_oa_with_economizer: 750.0,
    motorized_damper_exempt_zones: &[
        "0A", "0B", "1A", "1B", "2A", "2B", "3A", "3B", "3C",
    ],
    two_stage_min_cooling_capacity: 65_000.0,
    sat_reset_exempt_zones: &["0A", "1A", "2A", "3A"],
    erv_operating_hours_threshold: 8000.0,
    occupant_diversity: 0.66,
    vrp_damper_safety_factor: 1.5,
};

static PRM_2019: PrmTable = PrmTable {
    group_minimum_area: 20_000.0,
    xcel_group_minimum_area: 5_000.0,
    small_system_area_limit: 25_000.0,
    large_system_area_limit: 150_000.0,
    electric_heating_zones: &["1A", "2A", "3A"],
    vav_fan_type: "Variable Speed Fan",
    skylight_to_roof_ratio_limit: 3.0,
    requires_proposed_model_sizing_run: true,
    fan_power_breakdown: true,
    unit_heater_supply_temperature: 105.0,
    lab_delta_t: 17.0,
    preheat_offset: 20.0,
    default_heating_setpoint: 22.2,
    infiltration_rate_at_75pa: 1.0,
    infiltration_conversion_factor: 0.112,
    default_infiltration_coefficients: [0.0, 0.0, 0.224, 0.0],
    baseline_dcv_min_oa: 3000.0,
    baseline_dcv_max_occupancy: 100.0,
    user_dcv_min_zone_area: 500.0,
    user_dcv_min_occupancy: 25.0,
};

static EDITIONS: [EditionProfile; 3] = [
    EditionProfile {
        template: Template::Ashrae2016,
        minimum_zone_ventilation_efficiency: 0.6,
        air_loop: None,
        prm: None,
    },
    EditionProfile {
        template: Template::Ashrae2019,
        minimum_zone_ventilation_efficiency: 0.6,
        air_loop: Some(&AIR_LOOP_2019),
        prm: None,
    },
    EditionProfile {
        template: Template::Prm2019,
        minimum_zone_ventilation_efficiency: 0.6,
        air_loop: Some(&AIR_LOOP_2019),
        prm: Some(&PRM_2019),
    },
];

impl EditionProfile {
    /// The profile of `template`, if the crate evaluates that edition.
    pub fn for_template(template: Template) -> Option<&'static EditionProfile> {
        EDITIONS.iter().find(|p| p.template == template)
    }

    /// Templates that have a profile.
    pub fn supported_templates() -> impl Iterator<Item = Template> {
        EDITIONS.iter().map(|p| p.template)
    }
}

// ─── Rule set ───────────────────────────────────────────────────────────────

/// Rule evaluation context for one configuration.
#[derive(Debug, Clone, Copy)]
pub struct RuleSet<'a> {
    config: RuleConfig,
    profile: &'static EditionProfile,
    standards: &'a StandardsData,
}

impl<'a> RuleSet<'a> {
    /// Select the rule set for `config.template`.
    pub fn new(config: RuleConfig, standards: &'a StandardsData) -> RuleResult<Self> {
        let profile = EditionProfile::for_template(config.template).ok_or(
            RuleError::UnsupportedTemplate {
                template: config.template,
                rule: "rule set",
            },
        )?;
        tracing::debug!(
            template = %config.template,
            building_type = ?config.building_type,
            custom = ?config.custom,
            "selected rule set"
        );
        Ok(Self {
            config,
            profile,
            standards,
        })
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn template(&self) -> Template {
        self.config.template
    }

    pub fn profile(&self) -> &'static EditionProfile {
        self.profile
    }

    pub fn standards(&self) -> &'a StandardsData {
        self.standards
    }

    /// Minimum zone ventilation efficiency.
    pub fn minimum_zone_ventilation_efficiency(&self) -> f64 {
        self.profile.minimum_zone_ventilation_efficiency
    }

    pub(crate) fn air_loop_table(&self, rule: &'static str) -> RuleResult<&'static AirLoopTable> {
        self.profile.air_loop.ok_or(RuleError::UnsupportedTemplate {
            template: self.config.template,
            rule,
        })
    }

    pub(crate) fn prm_table(&self, rule: &'static str) -> RuleResult<&'static PrmTable> {
        self.profile.prm.ok_or(RuleError::UnsupportedTemplate {
            template: self.config.template,
            rule,
        })
    }
}
