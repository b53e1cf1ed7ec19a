//! # Zone Ventilation Quantities
//!
//! Breathing-zone outdoor air, floor area, and occupancy of a thermal zone,
//! summed over its spaces. Sums here exclude the zone multiplier; callers
//! that need building totals apply it once.

use prm_core::units::m2_to_ft2;
use prm_core::ThermalZoneId;
use prm_model::{DesignSpecificationOutdoorAir, Model, OutdoorAirMethod};

use crate::error::RuleResult;

/// Outdoor airflow required by the zone's spaces, m³/s.
pub fn zone_outdoor_airflow_rate(model: &Model, zone: ThermalZoneId) -> f64 {
    model
        .zone_spaces(zone)
        .into_iter()
        .filter_map(|space| {
            let oa = model.space_design_outdoor_air(space)?;
            let people = model.space_number_of_people(space);
            Some(oa.flow_rate(space.floor_area, space.volume, people))
        })
        .sum()
}

/// Floor area of the zone's spaces, m².
pub fn zone_floor_area(model: &Model, zone: ThermalZoneId) -> f64 {
    model.zone_spaces(zone).iter().map(|s| s.floor_area).sum()
}

pub fn zone_number_of_people(model: &Model, zone: ThermalZoneId) -> f64 {
    model
        .zone_spaces(zone)
        .iter()
        .map(|s| model.space_number_of_people(s))
        .sum()
}

/// People per 1000 ft². Zero for a zone without floor area.
pub fn zone_occupancy_per_1000_ft2(model: &Model, zone: ThermalZoneId) -> f64 {
    let area_ft2 = m2_to_ft2(zone_floor_area(model, zone));
    if area_ft2 <= 0.0 {
        return 0.0;
    }
    zone_number_of_people(model, zone) / area_ft2 * 1000.0
}

/// Whether any space in the zone has a per-person outdoor-air requirement
/// that DCV can modulate.
pub fn zone_has_per_person_outdoor_air(model: &Model, zone: ThermalZoneId) -> bool {
    model.zone_spaces(zone).into_iter().any(|space| {
        model
            .space_design_outdoor_air(space)
            .map_or(false, |oa| oa.method != OutdoorAirMethod::Maximum && oa.flow_per_person > 0.0)
    })
}

/// Fold each space's per-person outdoor air into its per-area rate.
///
/// The result is written to the space, so a specification shared through a
/// space type is copied rather than changed for every space using it.
pub fn convert_oa_req_to_per_area(model: &mut Model, zone: ThermalZoneId) -> RuleResult<()> {
    let updates: Vec<_> = model
        .zone_spaces(zone)
        .into_iter()
        .filter_map(|space| {
            let oa = model.space_design_outdoor_air(space)?;
            if oa.flow_per_person == 0.0 {
                return None;
            }
            let people = model.space_number_of_people(space);
            let per_area = if space.floor_area > 0.0 {
                oa.flow_per_person * people / space.floor_area
            } else {
                0.0
            };
            let converted = DesignSpecificationOutdoorAir {
                name: oa.name.clone(),
                method: oa.method,
                flow_per_person: 0.0,
                flow_per_floor_area: oa.flow_per_floor_area + per_area,
                flow_per_zone: oa.flow_per_zone,
                air_changes_per_hour: oa.air_changes_per_hour,
            };
            Some((space.id, converted))
        })
        .collect();

    for (space_id, oa) in updates {
        let space = model.space_mut(space_id)?;
        tracing::debug!(space = %space.name, per_area = oa.flow_per_floor_area, "converted OA to per-area");
        space.design_outdoor_air = Some(oa);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prm_model::{LoadAmount, LoadHost, LoadKind, Space, SpaceLoad, SpaceType, ThermalZone};

    fn oa(per_person: f64, per_area: f64) -> DesignSpecificationOutdoorAir {
        DesignSpecificationOutdoorAir {
            name: "OA".into(),
            method: OutdoorAirMethod::Sum,
            flow_per_person: per_person,
            flow_per_floor_area: per_area,
            flow_per_zone: 0.0,
            air_changes_per_hour: 0.0,
        }
    }

    fn office() -> (Model, ThermalZoneId) {
        let mut model = Model::new("B");
        let mut zone = ThermalZone::new("Z");
        zone.multiplier = 3;
        let zone_id = model.add_thermal_zone(zone);
        let mut st = SpaceType::new("Office");
        st.design_outdoor_air = Some(oa(0.0025, 0.0003));
        let st_id = model.add_space_type(st);
        for name in ["S1", "S2"] {
            let mut s = Space::new(name, 100.0, 300.0);
            s.space_type = Some(st_id);
            s.thermal_zone = Some(zone_id);
            model.add_space(s);
        }
        model.add_load(SpaceLoad::new(
            "People",
            LoadKind::People,
            LoadHost::SpaceType(st_id),
            LoadAmount::PerFloorArea(0.05),
        ));
        (model, zone_id)
    }

    #[test]
    fn test_zone_oa_excludes_multiplier() {
        let (model, zone) = office();
        let expected = 2.0 * (0.0025 * 5.0 + 0.0003 * 100.0);
        assert!((zone_outdoor_airflow_rate(&model, zone) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_occupancy_density() {
        let (model, zone) = office();
        assert_eq!(zone_number_of_people(&model, zone), 10.0);
        let expected = 10.0 / m2_to_ft2(200.0) * 1000.0;
        assert!((zone_occupancy_per_1000_ft2(&model, zone) - expected).abs() < 1e-9);
        assert!(zone_has_per_person_outdoor_air(&model, zone));
    }

    #[test]
    fn test_empty_zone_has_zero_density() {
        let mut model = Model::new("B");
        let zone = model.add_thermal_zone(ThermalZone::new("Empty"));
        assert_eq!(zone_occupancy_per_1000_ft2(&model, zone), 0.0);
        assert_eq!(zone_outdoor_airflow_rate(&model, zone), 0.0);
    }

    #[test]
    fn test_convert_to_per_area_preserves_total() {
        let (mut model, zone) = office();
        let before = zone_outdoor_airflow_rate(&model, zone);
        convert_oa_req_to_per_area(&mut model, zone).unwrap();
        let after = zone_outdoor_airflow_rate(&model, zone);
        assert!((before - after).abs() < 1e-12);
        assert!(!zone_has_per_person_outdoor_air(&model, zone));
        let st = &model.space_types[0];
        assert_eq!(st.design_outdoor_air.as_ref().unwrap().flow_per_person, 0.0025);
    }
}
