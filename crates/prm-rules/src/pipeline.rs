//! # Baseline Pipeline
//!
//! Runs the Appendix G baseline rules over a model in order:
//!
//! 1. DCV evaluation of the user model (fails when required DCV is missing),
//! 2. envelope infiltration,
//! 3. skylight-to-roof ratio,
//! 4. sizing design-day schedules,
//! 5. building area types,
//! 6. non-mechanically cooled systems,
//! 7. baseline DCV,
//! 8. the ventilation rate procedure on multizone VAV loops.
//!
//! Steps switched off in [`BaselineSteps`](crate::config::BaselineSteps)
//! are skipped and reported as `None`.

use serde::Serialize;

use prm_core::AirLoopId;
use prm_model::Model;
use prm_standards::{StandardsData, UserData};

use crate::air_loop::multizone_vav_system;
use crate::area_types::{handle_multi_building_area_types, BuildingAreaTypeAssignment};
use crate::config::RunConfig;
use crate::dcv::{DcvFindings, DcvOutcome, DcvPipeline, ZoneDcvRecord};
use crate::error::RuleResult;
use crate::infiltration::InfiltrationSummary;
use crate::nmc::{identify_non_mechanically_cooled_systems, NonMechanicallyCooled};
use crate::ruleset::RuleSet;
use crate::sizing::SizingScheduleSummary;
use crate::skylight::SkylightRatioAdjustment;
use crate::vrp::VrpAdjustment;

/// What a baseline run changed and found.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BaselineReport {
    pub template: String,
    pub climate_zone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dcv_findings: Option<DcvFindings>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dcv_zones: Vec<ZoneDcvRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dcv: Option<DcvOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infiltration: Option<InfiltrationSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skylights: Option<SkylightRatioAdjustment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizing_schedules: Option<SizingScheduleSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_types: Option<BuildingAreaTypeAssignment>,
    pub non_mechanically_cooled: NonMechanicallyCooled,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vrp: Vec<VrpAdjustment>,
}

/// Apply the baseline rules of `run` to `model`.
pub fn run_baseline(
    model: &mut Model,
    standards: &StandardsData,
    run: &RunConfig,
    user_data: &UserData,
) -> RuleResult<BaselineReport> {
    let rules = RuleSet::new(run.rules, standards)?;
    let steps = run.steps;
    let mut report = BaselineReport {
        template: run.rules.template.to_string(),
        climate_zone: run.climate_zone.to_string(),
        ..BaselineReport::default()
    };
    tracing::info!(
        template = %report.template,
        climate_zone = %report.climate_zone,
        model = %model.building.name,
        "starting baseline run"
    );

    let dcv = if steps.dcv {
        let evaluated = DcvPipeline::new(model)
            .mark_user_model_dcv(model)
            .apply_user_exceptions(user_data)
            .evaluate_requirements(model, &rules, &run.climate_zone)?;
        report.dcv_findings = Some(evaluated.report_user_model_findings().into_result()?);
        Some(evaluated)
    } else {
        None
    };

    if steps.infiltration {
        report.infiltration = rules.apply_infiltration_standard(model)?;
    }
    if steps.skylights {
        report.skylights = Some(rules.apply_baseline_skylight_to_roof_ratio(model)?);
    }
    if steps.sizing_schedules {
        report.sizing_schedules = Some(rules.apply_baseline_sizing_schedule(model)?);
    }
    match &run.area_type_defaults {
        Some(defaults) => {
            report.area_types = Some(handle_multi_building_area_types(model, defaults, user_data));
        }
        None => tracing::debug!("no area type defaults configured, area types not resolved"),
    }
    report.non_mechanically_cooled = identify_non_mechanically_cooled_systems(model);

    if let Some(evaluated) = dcv {
        let assessed = evaluated.evaluate_baseline_exemptions(model, &rules)?;
        report.dcv = Some(assessed.apply_baseline_dcv(model)?);
        report.dcv_zones = assessed.zones().to_vec();
    }

    if steps.vrp {
        let vav_loops: Vec<AirLoopId> = model
            .air_loops
            .iter()
            .filter(|l| multizone_vav_system(l) && l.outdoor_air_system.is_some())
            .map(|l| l.id)
            .collect();
        for id in vav_loops {
            if let Some(adjustment) = rules.adjust_minimum_vav_damper_positions(model, id)? {
                report.vrp.push(adjustment);
            }
        }
    }

    tracing::info!(
        vrp_loops = report.vrp.len(),
        nmc_loops = report.non_mechanically_cooled.air_loops.len(),
        "baseline run complete"
    );
    Ok(report)
}
