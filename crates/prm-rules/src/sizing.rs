//! # Baseline Sizing Schedules
//!
//! G3.1.2.2.1: baseline equipment is sized with load schedules at their
//! annual extremes. Every people, lighting, equipment, and infiltration
//! ruleset schedule gets flat design-day profiles: the annual maximum on the
//! cooling design day and the annual minimum on the heating design day
//! (infiltration uses the maximum on both). Loads in dwelling units use
//! their most frequent weekday value on the cooling design day.
//!
//! A schedule shared by several loads is rewritten once per load, in model
//! order; the last load wins.

use serde::Serialize;

use prm_core::ScheduleId;
use prm_model::{Model, ScheduleDay, ScheduleKind, SpaceType};

use crate::error::RuleResult;
use crate::ruleset::RuleSet;

/// One design-day rewrite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizingScheduleUpdate {
    pub load: String,
    pub schedule: String,
    pub summer_value: f64,
    pub winter_value: f64,
    pub dwelling: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SizingScheduleSummary {
    pub updated: Vec<SizingScheduleUpdate>,
    /// Loads left alone because their schedule is constant.
    pub skipped_constant: Vec<String>,
}

struct SizingTarget {
    load: String,
    schedule: ScheduleId,
    infiltration: bool,
    dwelling: bool,
}

fn is_dwelling(space_type: Option<&SpaceType>) -> bool {
    space_type
        .and_then(|st| st.standards_space_type.as_deref())
        .is_some_and(|s| s.to_ascii_lowercase().contains("apartment"))
}

fn sizing_targets(model: &Model) -> Vec<SizingTarget> {
    let mut targets = Vec::new();
    for load in &model.loads {
        let Some(schedule) = load.schedule else {
            continue;
        };
        let space_type = model.load_space_type(load);
        if space_type.is_none() {
            tracing::debug!(load = %load.name, "no hosting space type found for load");
        }
        targets.push(SizingTarget {
            load: load.name.clone(),
            schedule,
            infiltration: false,
            dwelling: is_dwelling(space_type),
        });
    }
    for space_type in &model.space_types {
        for infil in &space_type.infiltration {
            if let Some(schedule) = infil.schedule {
                targets.push(SizingTarget {
                    load: infil.name.clone(),
                    schedule,
                    infiltration: true,
                    dwelling: is_dwelling(Some(space_type)),
                });
            }
        }
    }
    for space in &model.spaces {
        for infil in &space.infiltration {
            if let Some(schedule) = infil.schedule {
                targets.push(SizingTarget {
                    load: infil.name.clone(),
                    schedule,
                    infiltration: true,
                    dwelling: is_dwelling(model.space_type_of(space)),
                });
            }
        }
    }
    targets
}

impl RuleSet<'_> {
    /// Write sizing design-day profiles on every load schedule.
    pub fn apply_baseline_sizing_schedule(&self, model: &mut Model) -> RuleResult<SizingScheduleSummary> {
        self.prm_table("apply_baseline_sizing_schedule")?;

        let mut summary = SizingScheduleSummary::default();
        for target in sizing_targets(model) {
            let schedule = model.schedule(target.schedule)?;
            match schedule.kind {
                ScheduleKind::Ruleset(_) => {}
                ScheduleKind::Constant { .. } => {
                    tracing::warn!(
                        load = %target.load,
                        schedule = %schedule.name,
                        "load schedule is constant, no sizing design days set"
                    );
                    summary.skipped_constant.push(target.load);
                    continue;
                }
                ScheduleKind::Compact { .. } => {
                    tracing::debug!(
                        load = %target.load,
                        schedule = %schedule.name,
                        "compact load schedule left unchanged"
                    );
                    continue;
                }
            }

            let Some((min, max)) = schedule.annual_min_max() else {
                continue;
            };
            let mut summer_value = max;
            let winter_value = if target.infiltration { max } else { min };
            if target.dwelling {
                if let Some(mode) = schedule.weekday_mode() {
                    summer_value = mode;
                }
            }
            let schedule_name = schedule.name.clone();

            let Some(ruleset) = model.schedule_mut(target.schedule)?.as_ruleset_mut() else {
                continue;
            };
            ruleset.summer_design_day = Some(ScheduleDay::constant(
                format!("{} Summer Design Day", target.load),
                summer_value,
            ));
            ruleset.winter_design_day = Some(ScheduleDay::constant(
                format!("{} Winter Design Day", target.load),
                winter_value,
            ));
            tracing::debug!(
                load = %target.load,
                schedule = %schedule_name,
                summer_value,
                winter_value,
                "set sizing design days"
            );
            summary.updated.push(SizingScheduleUpdate {
                load: target.load,
                schedule: schedule_name,
                summer_value,
                winter_value,
                dwelling: target.dwelling,
            });
        }
        tracing::info!(
            updated = summary.updated.len(),
            skipped = summary.skipped_constant.len(),
            "applied baseline sizing schedules"
        );
        Ok(summary)
    }
}
