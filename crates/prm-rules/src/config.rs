//! # Rule and Run Configuration
//!
//! [`RuleConfig`] carries what selects rule behavior: the code edition, the
//! prototype building type, and an optional utility program. It is passed to
//! every rule explicitly through [`crate::RuleSet`].
//!
//! [`RunConfig`] is the YAML document a baseline run is driven from.
//!
//! ```yaml
//! template: 90.1-PRM-2019
//! climate_zone: ASHRAE 169-2013-4A
//! building_type: MediumOffice
//! area_type_defaults:
//!   hvac: nonresidential
//!   wwr: office
//!   swh: office
//! steps:
//!   skylights: false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use prm_core::{ClimateZone, CustomProgram, Template};
use prm_standards::BuildingType;

use crate::error::{RuleError, RuleResult};

/// Rule selection inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub template: Template,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_type: Option<BuildingType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomProgram>,
}

impl RuleConfig {
    pub fn new(template: Template) -> Self {
        Self {
            template,
            building_type: None,
            custom: None,
        }
    }

    pub fn with_building_type(mut self, building_type: BuildingType) -> Self {
        self.building_type = Some(building_type);
        self
    }

    pub fn with_custom(mut self, custom: CustomProgram) -> Self {
        self.custom = Some(custom);
        self
    }
}

/// Area types used when neither zone nor building user data names one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaTypeDefaults {
    pub hvac: String,
    pub wwr: String,
    pub swh: String,
}

/// Which baseline steps a run applies. All default to on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineSteps {
    pub dcv: bool,
    pub infiltration: bool,
    pub skylights: bool,
    pub sizing_schedules: bool,
    pub vrp: bool,
}

impl Default for BaselineSteps {
    fn default() -> Self {
        Self {
            dcv: true,
            infiltration: true,
            skylights: true,
            sizing_schedules: true,
            vrp: true,
        }
    }
}

/// A baseline run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(flatten)]
    pub rules: RuleConfig,
    pub climate_zone: ClimateZone,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_type_defaults: Option<AreaTypeDefaults>,
    #[serde(default)]
    pub steps: BaselineSteps,
}

impl RunConfig {
    /// Parse a run configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> RuleResult<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        if !config.rules.template.is_prm() {
            tracing::warn!(
                template = %config.rules.template,
                "baseline runs apply Appendix G rules; template is not a PRM edition"
            );
        }
        Ok(config)
    }

    /// Load a run configuration file.
    pub fn load(path: &Path) -> RuleResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RuleError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUN_YAML: &str = r#"
template: 90.1-PRM-2019
climate_zone: ASHRAE 169-2013-4A
building_type: MediumOffice
custom: Xcel Energy CO EDA
area_type_defaults:
  hvac: nonresidential
  wwr: office
  swh: office
steps:
  skylights: false
"#;

    #[test]
    fn test_parse_run_config() {
        let run = RunConfig::from_yaml_str(RUN_YAML).unwrap();
        assert_eq!(run.rules.template, Template::Prm2019);
        assert_eq!(run.rules.building_type, Some(BuildingType::MediumOffice));
        assert_eq!(run.rules.custom, Some(CustomProgram::XcelEnergyCoEda));
        assert_eq!(run.climate_zone.code(), "4A");
        assert_eq!(run.area_type_defaults.unwrap().wwr, "office");
        assert!(!run.steps.skylights);
        assert!(run.steps.vrp);
    }

    #[test]
    fn test_minimal_run_config() {
        let run =
            RunConfig::from_yaml_str("template: 90.1-2019\nclimate_zone: ASHRAE 169-2013-2A\n").unwrap();
        assert_eq!(run.rules, RuleConfig::new(Template::Ashrae2019));
        assert!(run.area_type_defaults.is_none());
        assert_eq!(run.steps, BaselineSteps::default());
    }

    #[test]
    fn test_bad_climate_zone_rejected() {
        let err = RunConfig::from_yaml_str("template: 90.1-2019\nclimate_zone: 9Z\n").unwrap_err();
        assert!(matches!(err, RuleError::Yaml(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RunConfig::load(&dir.path().join("run.yaml")).unwrap_err();
        assert!(matches!(err, RuleError::Config(_)));
    }

    #[test]
    fn test_builders() {
        let c = RuleConfig::new(Template::Prm2019)
            .with_building_type(BuildingType::Hospital)
            .with_custom(CustomProgram::XcelEnergyCoEda);
        assert_eq!(c.building_type, Some(BuildingType::Hospital));
        assert_eq!(c.custom, Some(CustomProgram::XcelEnergyCoEda));
    }
}
