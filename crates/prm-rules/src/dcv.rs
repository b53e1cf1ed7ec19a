//! # Demand Control Ventilation Pipeline
//!
//! Evaluates demand control ventilation (DCV) across the user model and the
//! baseline in a fixed order. Each phase is a distinct type, so a phase
//! cannot run before the one it depends on.
//!
//! ```text
//! Start ──mark_user_model_dcv()──▶ Marked
//!       ──apply_user_exceptions()──▶ ExceptionsApplied
//!       ──evaluate_requirements()──▶ RequirementsEvaluated ──report_user_model_findings()
//!       ──evaluate_baseline_exemptions()──▶ BaselineAssessed ──apply_baseline_dcv()
//! ```
//!
//! ## Design
//!
//! Results live in per-zone and per-loop records owned by the pipeline,
//! never on the model objects. Records refer to model objects by id and
//! keep their names for reporting. The baseline phases expect the zones and
//! loops the user-model phases saw.
//!
//! A zone served by several air loops takes its baseline result from the
//! last loop evaluated.

use std::marker::PhantomData;

use serde::Serialize;

use prm_core::units::m3_per_s_to_cfm;
use prm_core::{AirLoopId, ClimateZone, ThermalZoneId};
use prm_model::{AirLoop, Model};
use prm_standards::{flag_is_true, UserData};

use crate::air_loop::enable_demand_control_ventilation;
use crate::error::{RuleError, RuleResult};
use crate::ruleset::RuleSet;
use crate::ventilation::{
    convert_oa_req_to_per_area, zone_floor_area, zone_has_per_person_outdoor_air,
    zone_occupancy_per_1000_ft2,
};

// ─── Phases ─────────────────────────────────────────────────────────────────

/// Records built, nothing evaluated.
#[derive(Debug, Clone, Copy)]
pub struct Start;

/// User-model DCV implementation marked.
#[derive(Debug, Clone, Copy)]
pub struct Marked;

/// User-data exceptions applied.
#[derive(Debug, Clone, Copy)]
pub struct ExceptionsApplied;

/// User-model requirements evaluated.
#[derive(Debug, Clone, Copy)]
pub struct RequirementsEvaluated;

/// Baseline exemptions evaluated.
#[derive(Debug, Clone, Copy)]
pub struct BaselineAssessed;

mod private {
    pub trait Sealed {}
    impl Sealed for super::Start {}
    impl Sealed for super::Marked {}
    impl Sealed for super::ExceptionsApplied {}
    impl Sealed for super::RequirementsEvaluated {}
    impl Sealed for super::BaselineAssessed {}
}

/// Marker trait for pipeline phases.
pub trait DcvPhase: private::Sealed + std::fmt::Debug {
    fn name() -> &'static str;
}

impl DcvPhase for Start {
    fn name() -> &'static str {
        "START"
    }
}
impl DcvPhase for Marked {
    fn name() -> &'static str {
        "MARKED"
    }
}
impl DcvPhase for ExceptionsApplied {
    fn name() -> &'static str {
        "EXCEPTIONS_APPLIED"
    }
}
impl DcvPhase for RequirementsEvaluated {
    fn name() -> &'static str {
        "REQUIREMENTS_EVALUATED"
    }
}
impl DcvPhase for BaselineAssessed {
    fn name() -> &'static str {
        "BASELINE_ASSESSED"
    }
}

// ─── Records ────────────────────────────────────────────────────────────────

/// Baseline DCV result for a zone or loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineDcv {
    NotAssessed,
    /// The loop has no outdoor-air system.
    NotApplicable,
    NotNeeded,
    Needed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirLoopDcvRecord {
    pub air_loop: AirLoopId,
    pub name: String,
    pub has_outdoor_air_system: bool,
    pub dcv_enabled: bool,
    pub user_exception: bool,
    pub dcv_required: bool,
    pub baseline: BaselineDcv,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneDcvRecord {
    pub zone: ThermalZoneId,
    pub zone_name: String,
    pub air_loops: Vec<AirLoopId>,
    pub implemented_in_user_model: bool,
    pub air_loop_user_exception: bool,
    pub zone_user_exception: bool,
    pub air_loop_dcv_required: bool,
    pub zone_dcv_required: bool,
    pub baseline: BaselineDcv,
}

/// Severity of a user-model finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingSeverity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DcvFinding {
    pub zone_name: String,
    pub severity: FindingSeverity,
    pub message: String,
}

/// User-model findings of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DcvFindings {
    pub findings: Vec<DcvFinding>,
}

impl DcvFindings {
    pub fn warnings(&self) -> impl Iterator<Item = &DcvFinding> {
        self.findings.iter().filter(|f| f.severity == FindingSeverity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &DcvFinding> {
        self.findings.iter().filter(|f| f.severity == FindingSeverity::Error)
    }

    /// Fail when any zone requires DCV the user model lacks; otherwise
    /// return the findings (warnings only).
    pub fn into_result(self) -> RuleResult<Self> {
        let mut zones: Vec<String> = self.errors().map(|f| f.zone_name.clone()).collect();
        if zones.is_empty() {
            return Ok(self);
        }
        zones.sort();
        Err(RuleError::DcvRequiredNotImplemented { zones })
    }
}

/// Changes made to the baseline.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DcvOutcome {
    pub enabled_air_loops: Vec<String>,
    pub per_area_zones: Vec<String>,
}

// ─── Pipeline ───────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct DcvPipeline<S: DcvPhase> {
    air_loops: Vec<AirLoopDcvRecord>,
    zones: Vec<ZoneDcvRecord>,
    _phase: PhantomData<S>,
}

impl<S: DcvPhase> DcvPipeline<S> {
    pub fn phase_name(&self) -> &'static str {
        S::name()
    }

    /// Zone records, sorted by zone name.
    pub fn zones(&self) -> &[ZoneDcvRecord] {
        &self.zones
    }

    /// Air-loop records, in model order.
    pub fn air_loops(&self) -> &[AirLoopDcvRecord] {
        &self.air_loops
    }

    pub fn zone(&self, name: &str) -> Option<&ZoneDcvRecord> {
        self.zones.iter().find(|z| z.zone_name == name)
    }

    pub fn air_loop(&self, name: &str) -> Option<&AirLoopDcvRecord> {
        self.air_loops.iter().find(|l| l.name == name)
    }

    fn advance<T: DcvPhase>(self) -> DcvPipeline<T> {
        tracing::debug!(from = S::name(), to = T::name(), "DCV pipeline phase");
        DcvPipeline {
            air_loops: self.air_loops,
            zones: self.zones,
            _phase: PhantomData,
        }
    }
}

fn dcv_enabled(air_loop: &AirLoop) -> bool {
    air_loop
        .controller_oa()
        .map_or(false, |c| c.mechanical_ventilation.demand_controlled_ventilation)
}

impl DcvPipeline<Start> {
    /// Build one record per zone and air loop of `model`.
    pub fn new(model: &Model) -> Self {
        let air_loops = model
            .air_loops
            .iter()
            .map(|l| AirLoopDcvRecord {
                air_loop: l.id,
                name: l.name.clone(),
                has_outdoor_air_system: l.controller_oa().is_some(),
                dcv_enabled: dcv_enabled(l),
                user_exception: false,
                dcv_required: false,
                baseline: BaselineDcv::NotAssessed,
            })
            .collect();

        let mut zones: Vec<ZoneDcvRecord> = model
            .thermal_zones
            .iter()
            .map(|z| ZoneDcvRecord {
                zone: z.id,
                zone_name: z.name.clone(),
                air_loops: model.zone_air_loops(z.id).iter().map(|l| l.id).collect(),
                implemented_in_user_model: false,
                air_loop_user_exception: false,
                zone_user_exception: false,
                air_loop_dcv_required: false,
                zone_dcv_required: false,
                baseline: BaselineDcv::NotAssessed,
            })
            .collect();
        zones.sort_by(|a, b| a.zone_name.cmp(&b.zone_name));

        Self {
            air_loops,
            zones,
            _phase: PhantomData,
        }
    }

    /// Mark zones whose user-model loop runs DCV on a per-person outdoor-air
    /// requirement.
    pub fn mark_user_model_dcv(mut self, model: &Model) -> DcvPipeline<Marked> {
        let enabled: Vec<AirLoopId> = self
            .air_loops
            .iter()
            .filter(|l| l.has_outdoor_air_system && l.dcv_enabled)
            .map(|l| l.air_loop)
            .collect();
        for zone in &mut self.zones {
            if zone.air_loops.iter().any(|id| enabled.contains(id)) {
                zone.implemented_in_user_model = zone_has_per_person_outdoor_air(model, zone.zone);
            }
        }
        tracing::info!(
            zones = self.zones.iter().filter(|z| z.implemented_in_user_model).count(),
            "zones with DCV in the user model"
        );
        self.advance()
    }
}

impl DcvPipeline<Marked> {
    /// Apply the `dcv_exception_airloop` and `dcv_exception_thermal_zone`
    /// user-data flags.
    pub fn apply_user_exceptions(mut self, user_data: &UserData) -> DcvPipeline<ExceptionsApplied> {
        for air_loop in &mut self.air_loops {
            air_loop.user_exception = user_data
                .air_loop(&air_loop.name)
                .map_or(false, |row| flag_is_true(row.dcv_exception_airloop.as_ref()));
            if air_loop.user_exception {
                tracing::info!(air_loop = %air_loop.name, "DCV exception from user data");
            }
        }
        let excepted: Vec<AirLoopId> = self
            .air_loops
            .iter()
            .filter(|l| l.user_exception)
            .map(|l| l.air_loop)
            .collect();
        for zone in &mut self.zones {
            zone.air_loop_user_exception = zone.air_loops.iter().any(|id| excepted.contains(id));
            zone.zone_user_exception = user_data
                .thermal_zone(&zone.zone_name)
                .map_or(false, |row| flag_is_true(row.dcv_exception_thermal_zone.as_ref()));
        }
        self.advance()
    }
}

impl DcvPipeline<ExceptionsApplied> {
    /// Decide where the user model must implement DCV.
    pub fn evaluate_requirements(
        mut self,
        model: &Model,
        rules: &RuleSet<'_>,
        climate_zone: &ClimateZone,
    ) -> RuleResult<DcvPipeline<RequirementsEvaluated>> {
        let table = rules.prm_table("evaluate_requirements")?;

        for record in &mut self.air_loops {
            let air_loop = model.air_loop(record.air_loop)?;
            record.dcv_required = !record.user_exception
                && rules.demand_control_ventilation_required(air_loop, climate_zone)?;
        }

        let required: Vec<AirLoopId> = self
            .air_loops
            .iter()
            .filter(|l| l.dcv_required)
            .map(|l| l.air_loop)
            .collect();
        for zone in &mut self.zones {
            zone.air_loop_dcv_required = zone.air_loops.iter().any(|id| required.contains(id));
            if !zone.air_loop_dcv_required || zone.zone_user_exception {
                continue;
            }
            let area_ft2 = prm_core::units::m2_to_ft2(zone_floor_area(model, zone.zone));
            let occupancy = zone_occupancy_per_1000_ft2(model, zone.zone);
            zone.zone_dcv_required =
                area_ft2 > table.user_dcv_min_zone_area && occupancy >= table.user_dcv_min_occupancy;
        }
        Ok(self.advance())
    }
}

impl DcvPipeline<RequirementsEvaluated> {
    /// Compare what the user model implements with what is required.
    pub fn report_user_model_findings(&self) -> DcvFindings {
        let mut findings = Vec::new();
        for zone in &self.zones {
            let required = zone.zone_dcv_required && zone.air_loop_dcv_required;
            if zone.implemented_in_user_model && !required {
                tracing::warn!(zone = %zone.zone_name, "DCV implemented in user model but not required");
                findings.push(DcvFinding {
                    zone_name: zone.zone_name.clone(),
                    severity: FindingSeverity::Warning,
                    message: "demand control ventilation implemented but not required".into(),
                });
            } else if required && !zone.implemented_in_user_model {
                tracing::error!(zone = %zone.zone_name, "DCV required but not implemented in user model");
                findings.push(DcvFinding {
                    zone_name: zone.zone_name.clone(),
                    severity: FindingSeverity::Error,
                    message: "demand control ventilation required but not implemented".into(),
                });
            }
        }
        DcvFindings { findings }
    }

    /// Decide where the baseline needs DCV.
    pub fn evaluate_baseline_exemptions(
        mut self,
        model: &Model,
        rules: &RuleSet<'_>,
    ) -> RuleResult<DcvPipeline<BaselineAssessed>> {
        let table = rules.prm_table("evaluate_baseline_exemptions")?;

        for i in 0..self.air_loops.len() {
            let id = self.air_loops[i].air_loop;
            let air_loop = model.air_loop(id)?;
            let loop_result = match air_loop.controller_oa() {
                None => {
                    tracing::info!(air_loop = %air_loop.name, "no outdoor air system, DCV not applicable");
                    BaselineDcv::NotApplicable
                }
                Some(controller) => {
                    let oa = air_loop
                        .sizing_system
                        .design_outdoor_air_flow_rate
                        .or_else(|| controller.minimum_outdoor_air_flow());
                    match oa {
                        None => {
                            tracing::warn!(air_loop = %air_loop.name, "outdoor air flow unknown, DCV not needed");
                            BaselineDcv::NotNeeded
                        }
                        Some(oa) if m3_per_s_to_cfm(oa) <= table.baseline_dcv_min_oa => {
                            BaselineDcv::NotNeeded
                        }
                        Some(_) => BaselineDcv::Needed,
                    }
                }
            };

            for zone in self.zones.iter_mut().filter(|z| z.air_loops.contains(&id)) {
                zone.baseline = match loop_result {
                    BaselineDcv::Needed => {
                        if zone_occupancy_per_1000_ft2(model, zone.zone) <= table.baseline_dcv_max_occupancy {
                            BaselineDcv::NotNeeded
                        } else {
                            BaselineDcv::Needed
                        }
                    }
                    other => other,
                };
            }
            self.air_loops[i].baseline = loop_result;
        }
        Ok(self.advance())
    }
}

impl DcvPipeline<BaselineAssessed> {
    /// Enable DCV on baseline loops serving a zone that needs it and fold the
    /// other zones' per-person outdoor air into per-area rates.
    pub fn apply_baseline_dcv(&self, model: &mut Model) -> RuleResult<DcvOutcome> {
        let mut outcome = DcvOutcome::default();
        for record in &self.air_loops {
            let served: Vec<&ZoneDcvRecord> = self
                .zones
                .iter()
                .filter(|z| z.air_loops.contains(&record.air_loop))
                .collect();
            if !served.iter().any(|z| z.baseline == BaselineDcv::Needed) {
                continue;
            }
            if enable_demand_control_ventilation(model.air_loop_mut(record.air_loop)?) {
                outcome.enabled_air_loops.push(record.name.clone());
            }
            for zone in served.iter().filter(|z| z.baseline != BaselineDcv::Needed) {
                convert_oa_req_to_per_area(model, zone.zone)?;
                outcome.per_area_zones.push(zone.zone_name.clone());
            }
        }
        tracing::info!(
            air_loops = outcome.enabled_air_loops.len(),
            per_area_zones = outcome.per_area_zones.len(),
            "applied baseline DCV"
        );
        Ok(outcome)
    }
}
