//! # Lookup CLI — Single code-requirement queries.
//!
//! `prm econ-limits` reports the economizer high limits for one air loop of
//! a model file. `prm system-type` reports the Table G3.1.1-3 baseline
//! system pair and the baseline heating fuel.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use prm_core::{ClimateZone, CustomProgram, Template};
use prm_model::load_model;
use prm_rules::{AreaType, BaselineSystemNumber, EconomizerLimits, HeatingFuel, RuleConfig, RuleSet};

use crate::{load_standards, write_json};

/// Arguments for `prm econ-limits`.
#[derive(Args, Debug)]
pub struct EconLimitsArgs {
    /// Code edition, e.g. `90.1-2019`.
    #[arg(long)]
    pub template: String,

    /// ASHRAE 169 climate zone, e.g. `ASHRAE 169-2013-5A`.
    #[arg(long)]
    pub climate_zone: String,

    /// Model file (`.json`, `.yaml`).
    #[arg(long)]
    pub model: PathBuf,

    /// Name of the air loop to evaluate.
    #[arg(long)]
    pub air_loop: String,

    /// Standards directory layered over the bundled tables.
    #[arg(long)]
    pub standards: Option<PathBuf>,
}

/// Arguments for `prm system-type`.
#[derive(Args, Debug)]
pub struct SystemTypeArgs {
    /// Appendix G edition.
    #[arg(long, default_value = "90.1-PRM-2019")]
    pub template: String,

    /// ASHRAE 169 climate zone.
    #[arg(long)]
    pub climate_zone: String,

    /// residential, nonresidential, heatedonly, or retail.
    #[arg(long)]
    pub area_type: String,

    /// Proposed heating fuel: electric, fossil, or purchased.
    #[arg(long)]
    pub fuel: String,

    /// Conditioned floor area of the area type, ft².
    #[arg(long)]
    pub area_ft2: f64,

    /// Number of floors above grade.
    #[arg(long)]
    pub stories: u32,

    /// Utility program overriding the code rules.
    #[arg(long)]
    pub custom: Option<String>,
}

#[derive(Debug, Serialize)]
struct EconLimitsOutput<'a> {
    air_loop: &'a str,
    economizer_type: String,
    limits: EconomizerLimits,
}

#[derive(Debug, Serialize)]
struct SystemTypeOutput {
    area_type: AreaType,
    system: Option<BaselineSystemNumber>,
    proposed_fuel: HeatingFuel,
    baseline_fuel: HeatingFuel,
}

fn parse_climate_zone(s: &str) -> Result<ClimateZone> {
    s.parse().with_context(|| format!("invalid climate zone: {s}"))
}

fn parse_template(s: &str) -> Result<Template> {
    s.parse().with_context(|| format!("invalid template: {s}"))
}

/// Execute `prm econ-limits`.
pub fn run_econ_limits(args: &EconLimitsArgs) -> Result<u8> {
    let template = parse_template(&args.template)?;
    let climate_zone = parse_climate_zone(&args.climate_zone)?;
    let standards = load_standards(args.standards.as_deref())?;
    let rules = RuleSet::new(RuleConfig::new(template), &standards)?;

    let model = load_model(&args.model)
        .with_context(|| format!("failed to load model: {}", args.model.display()))?;
    let air_loop = model
        .air_loop_by_name(&args.air_loop)
        .with_context(|| format!("no air loop named {:?} in {}", args.air_loop, args.model.display()))?;

    let limits = rules.economizer_limits(air_loop, &climate_zone)?;
    let economizer_type = air_loop
        .controller_oa()
        .map(|c| c.economizer_type.to_string())
        .unwrap_or_else(|| "none".to_string());
    write_json(
        &EconLimitsOutput {
            air_loop: &air_loop.name,
            economizer_type,
            limits,
        },
        None,
    )?;
    Ok(0)
}

/// Execute `prm system-type`.
pub fn run_system_type(args: &SystemTypeArgs) -> Result<u8> {
    let output = system_type(args)?;
    write_json(&output, None)?;
    Ok(if output.system.is_some() { 0 } else { 2 })
}

fn system_type(args: &SystemTypeArgs) -> Result<SystemTypeOutput> {
    let template = parse_template(&args.template)?;
    let climate_zone = parse_climate_zone(&args.climate_zone)?;
    let area_type: AreaType = args.area_type.parse()?;
    let proposed_fuel: HeatingFuel = args.fuel.parse()?;
    let mut config = RuleConfig::new(template);
    if let Some(custom) = &args.custom {
        let custom: CustomProgram = custom.parse()?;
        config = config.with_custom(custom);
    }

    let standards = load_standards(None)?;
    let rules = RuleSet::new(config, &standards)?;
    let system = rules.baseline_system_number(area_type, args.area_ft2, args.stories)?;
    if system.is_none() {
        tracing::warn!(
            area_type = %area_type,
            area_ft2 = args.area_ft2,
            stories = args.stories,
            "no baseline system row applies"
        );
    }
    let baseline_fuel = rules.baseline_system_change_fuel_type(proposed_fuel, &climate_zone)?;
    Ok(SystemTypeOutput {
        area_type,
        system,
        proposed_fuel,
        baseline_fuel,
    })
}
