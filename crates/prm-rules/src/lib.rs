//! # prm-rules — ASHRAE 90.1 and Appendix G Compliance Rules
//!
//! Code-mandated requirements for air loops and the Appendix G performance
//! rating method baseline: economizer limits, demand control ventilation,
//! the ventilation rate procedure, baseline system selection, envelope
//! infiltration, skylight area, and sizing schedules.
//!
//! ## Crate Policy
//!
//! - Rules that depend on the code edition are methods on [`RuleSet`],
//!   which binds a [`RuleConfig`] to the edition's constants and the
//!   standards database. Nothing reads global state.
//! - Rules mutate the model only through `&mut Model`; everything they
//!   conclude about it is returned as typed records, never stored as flags
//!   on model objects.
//! - Missing optional inputs mean "no requirement applies": the rule logs a
//!   warning and returns `None` or `false`. Hard failures are [`RuleError`].
//! - Libraries log through `tracing` and never install a subscriber.

pub mod air_loop;
pub mod area_types;
pub mod baseline;
pub mod config;
pub mod dcv;
pub mod error;
pub mod eui;
pub mod infiltration;
pub mod nmc;
pub mod pipeline;
pub mod ruleset;
pub mod sizing;
pub mod skylight;
pub mod ventilation;
pub mod vrp;

pub use air_loop::{DcvLimits, EconomizerLimits, MotorizedDamperLimits};
pub use area_types::{handle_multi_building_area_types, AreaTypeSource, BuildingAreaTypeAssignment};
pub use baseline::{space_residential, AreaType, BaselineSystemNumber, HeatingFuel, PreheatSetpoint};
pub use config::{AreaTypeDefaults, BaselineSteps, RuleConfig, RunConfig};
pub use dcv::{BaselineDcv, DcvFinding, DcvFindings, DcvOutcome, DcvPipeline};
pub use error::{RuleError, RuleResult};
pub use eui::find_target_eui_by_end_use;
pub use infiltration::InfiltrationSummary;
pub use nmc::{identify_non_mechanically_cooled_systems, NonMechanicallyCooled};
pub use pipeline::{run_baseline, BaselineReport};
pub use ruleset::{EditionProfile, RuleSet};
pub use sizing::SizingScheduleSummary;
pub use skylight::SkylightRatioAdjustment;
pub use vrp::{VrpAdjustment, ZoneDamperPosition};
