//! # Target EUI by End Use
//!
//! Energy use intensity targets come from stored simulation results of the
//! matching prototype: per end use, the annual consumption summed across
//! fuels divided by the prototype's floor area, in GJ/m².

use std::collections::BTreeMap;

use prm_core::ClimateZone;
use prm_model::Model;
use prm_standards::{BuildingType, PrototypeConfig, PrototypeRegistry};

use crate::config::RuleConfig;
use crate::error::{RuleError, RuleResult};

/// Target EUI per end use, GJ/m². Empty when no results are stored for the
/// prototype in this climate zone.
///
/// The building type comes from the rule configuration, else from the
/// model's standards building type. The climate zone comes from the model's
/// building record, else from `climate_zone`.
pub fn find_target_eui_by_end_use(
    model: &Model,
    registry: &PrototypeRegistry,
    config: &RuleConfig,
    climate_zone: Option<&ClimateZone>,
) -> RuleResult<BTreeMap<String, f64>> {
    let building_type = match config.building_type {
        Some(bt) => bt,
        None => model
            .building
            .standards_building_type
            .as_deref()
            .and_then(|s| s.parse::<BuildingType>().ok())
            .ok_or(RuleError::MissingBuildingType {
                rule: "find_target_eui_by_end_use",
            })?,
    };
    let climate_zone_code = model
        .building
        .climate_zone
        .clone()
        .or_else(|| climate_zone.map(|cz| cz.code()))
        .ok_or_else(|| RuleError::Config("target EUI needs a climate zone".into()))?;

    let prototype = registry.resolve(&PrototypeConfig {
        template: config.template,
        building_type,
    })?;
    let floor_area = prototype.input.floor_area_m2;
    if floor_area <= 0.0 {
        return Err(RuleError::Config(format!(
            "prototype {building_type} has no floor area"
        )));
    }

    let totals = registry.end_use_totals(config.template, building_type, &climate_zone_code);
    if totals.is_empty() {
        tracing::warn!(
            template = %config.template,
            building_type = %building_type,
            climate_zone = %climate_zone_code,
            "no stored prototype results, no target EUI"
        );
    }
    Ok(totals
        .into_iter()
        .map(|(end_use, gj)| (end_use, gj / floor_area))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prm_core::Template;
    use prm_standards::StandardsData;

    fn registry() -> PrototypeRegistry {
        PrototypeRegistry::from_data(&StandardsData::bundled().unwrap()).unwrap()
    }

    #[test]
    fn test_large_hotel_2007_2a() {
        let mut model = Model::new("Hotel");
        model.building.standards_building_type = Some("LargeHotel".into());
        model.building.climate_zone = Some("2A".into());
        let eui = find_target_eui_by_end_use(&model, &registry(), &RuleConfig::new(Template::Ashrae2007), None)
            .unwrap();
        let expected = (1751.31 + 1788.85) / 11345.0;
        assert!((eui["Interior Equipment"] - expected).abs() < 1e-12);
        assert_eq!(eui["Generators"], 0.0);
    }

    #[test]
    fn test_missing_building_type() {
        let model = Model::new("B");
        let err = find_target_eui_by_end_use(&model, &registry(), &RuleConfig::new(Template::Ashrae2007), None)
            .unwrap_err();
        assert!(matches!(err, RuleError::MissingBuildingType { .. }));
    }

    #[test]
    fn test_no_results_is_empty() {
        let model = Model::new("B");
        let config = RuleConfig::new(Template::Ashrae2019).with_building_type(BuildingType::LargeHotel);
        let cz = ClimateZone::from_code(prm_core::ClimateZoneSet::Ashrae169_2013, "5B").unwrap();
        let eui = find_target_eui_by_end_use(&model, &registry(), &config, Some(&cz)).unwrap();
        assert!(eui.is_empty());
    }
}
