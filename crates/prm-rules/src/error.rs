//! # Rule Errors
//!
//! Hard failures of the compliance rules. Missing inputs that only mean
//! "no requirement applies" are logged and returned as `None` or `false`
//! instead; see the crate documentation.

use prm_core::{PrmError, Template};
use prm_model::ModelError;
use prm_standards::StandardsError;
use thiserror::Error;

/// Errors raised by rule evaluation.
#[derive(Error, Debug)]
pub enum RuleError {
    /// The rule needs the loop's outdoor-air system and it has none.
    #[error("air loop {air_loop:?} has no outdoor air system")]
    MissingOutdoorAirSystem {
        /// Air loop name.
        air_loop: String,
    },

    /// The user model lacks demand control ventilation where it is required.
    /// Baseline generation stops.
    #[error("demand control ventilation required but not implemented in zones: {}", zones.join(", "))]
    DcvRequiredNotImplemented {
        /// Zone names, sorted.
        zones: Vec<String>,
    },

    /// The template has no table for the requested rule.
    #[error("rule {rule} is not defined for template {template}")]
    UnsupportedTemplate {
        /// Selected template.
        template: Template,
        /// Rule name.
        rule: &'static str,
    },

    /// The rule needs a prototype building type and none is configured.
    #[error("rule {rule} requires a building type in the rule configuration")]
    MissingBuildingType {
        /// Rule name.
        rule: &'static str,
    },

    /// A run configuration could not be used.
    #[error("invalid run configuration: {0}")]
    Config(String),

    /// Model navigation failure.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Standards data failure.
    #[error(transparent)]
    Standards(#[from] StandardsError),

    /// Classification or parse failure.
    #[error(transparent)]
    Core(#[from] PrmError),

    /// YAML error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias.
pub type RuleResult<T> = Result<T, RuleError>;
