//! # Baseline Envelope Infiltration
//!
//! G3.1.1.4: the baseline leaks 1.0 cfm/ft² of building envelope at 75 Pa,
//! adjusted by 0.112 to typical operating pressure, and modeled on every
//! space per unit of exterior wall area.
//!
//! The building envelope counts surfaces of conditioned and semiheated
//! spaces that face outdoors, the ground, or an unconditioned space.

use serde::Serialize;

use prm_core::units::cfm_per_ft2_to_m3_per_s_per_m2;
use prm_model::{
    ConditioningCategory, Infiltration, InfiltrationMethod, Model, OutsideBoundary, Space,
};

use crate::error::RuleResult;
use crate::ruleset::RuleSet;

/// What the infiltration rule wrote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfiltrationSummary {
    /// m².
    pub envelope_area: f64,
    /// Proposed-model leakage at 75 Pa, m³/s per m² of envelope.
    pub proposed_leakage_at_75pa: f64,
    /// m³/s.
    pub total_flow: f64,
    /// Method found in the proposed model.
    pub proposed_method: Option<InfiltrationMethod>,
    /// m³/s per m² of exterior wall.
    pub flow_per_exterior_wall_area: f64,
    pub coefficients: [f64; 4],
    /// Spaces given an infiltration object.
    pub spaces: usize,
}

/// Envelope area of one space including its multiplier, m².
pub fn space_envelope_area(model: &Model, space: &Space) -> f64 {
    if space.conditioning == ConditioningCategory::Unconditioned {
        return 0.0;
    }
    let area: f64 = space
        .surfaces
        .iter()
        .filter(|s| match s.outside_boundary {
            OutsideBoundary::Outdoors | OutsideBoundary::Ground => true,
            OutsideBoundary::Adiabatic => false,
            OutsideBoundary::Surface { adjacent_space } => model
                .space(adjacent_space)
                .map_or(false, |adj| adj.conditioning == ConditioningCategory::Unconditioned),
        })
        .map(|s| s.gross_area)
        .sum();
    area * model.space_multiplier(space)
}

pub fn building_envelope_area(model: &Model) -> f64 {
    model.spaces.iter().map(|s| space_envelope_area(model, s)).sum()
}

/// First infiltration object of each space, else of its space type.
fn representative_infiltration<'a>(model: &'a Model, space: &'a Space) -> Option<&'a Infiltration> {
    space
        .infiltration
        .first()
        .or_else(|| model.space_type_of(space).and_then(|st| st.infiltration.first()))
}

/// Infiltration method used by the model. `Flow/Area` when spaces disagree.
pub fn get_infiltration_method(model: &Model) -> Option<InfiltrationMethod> {
    let mut spaces: Vec<&Space> = model.spaces.iter().collect();
    spaces.sort_by(|a, b| a.name.cmp(&b.name));

    let mut method = None;
    for space in spaces {
        let Some(infil) = representative_infiltration(model, space) else {
            continue;
        };
        match method {
            Some(m) if m != infil.method => return Some(InfiltrationMethod::FlowPerArea),
            _ => method = Some(infil.method),
        }
    }
    method
}

/// Infiltration coefficients used by the model. `None` when the model has
/// no infiltration; the PRM default when spaces disagree.
pub fn get_infiltration_coefficients(model: &Model, default: [f64; 4]) -> Option<[f64; 4]> {
    let mut spaces: Vec<&Space> = model.spaces.iter().collect();
    spaces.sort_by(|a, b| a.name.cmp(&b.name));

    let mut coefficients = None;
    for space in spaces {
        let Some(infil) = representative_infiltration(model, space) else {
            continue;
        };
        match coefficients {
            Some(c) if c != infil.coefficients => return Some(default),
            _ => coefficients = Some(infil.coefficients),
        }
    }
    coefficients
}

/// Flow of one infiltration object in a space, m³/s. Design-flow objects
/// are not counted.
fn infiltration_flow(infil: &Infiltration, space: &Space) -> f64 {
    if infil.design_flow_rate.is_some() {
        return 0.0;
    }
    if let Some(v) = infil.flow_per_floor_area {
        v * space.floor_area
    } else if let Some(v) = infil.flow_per_exterior_surface_area {
        v * space.exterior_area()
    } else if let Some(v) = infil.flow_per_exterior_wall_area {
        v * space.exterior_wall_area()
    } else if let Some(ach) = infil.air_changes_per_hour {
        ach * space.volume / 3600.0
    } else {
        0.0
    }
}

impl RuleSet<'_> {
    /// Proposed-model leakage at 75 Pa, m³/s per m² of envelope.
    pub fn current_building_envelope_infiltration_at_75pa(
        &self,
        model: &Model,
        envelope_area: f64,
    ) -> RuleResult<f64> {
        let table = self.prm_table("current_building_envelope_infiltration_at_75pa")?;
        if envelope_area <= 0.0 {
            return Ok(0.0);
        }
        let mut leakage = 0.0;
        for space in &model.spaces {
            if let Some(infil) = space.infiltration.first() {
                leakage += infiltration_flow(infil, space);
            }
            if let Some(infil) = model.space_type_of(space).and_then(|st| st.infiltration.first()) {
                leakage += infiltration_flow(infil, space);
            }
        }
        Ok(leakage / table.infiltration_conversion_factor / envelope_area)
    }

    /// Baseline infiltration for the whole envelope, m³/s.
    pub fn adjusted_building_envelope_infiltration(&self, envelope_area: f64) -> RuleResult<f64> {
        let table = self.prm_table("adjusted_building_envelope_infiltration")?;
        if table.infiltration_rate_at_75pa == 0.0 {
            return Ok(0.0);
        }
        let adjusted_cfm_per_ft2 = table.infiltration_conversion_factor * table.infiltration_rate_at_75pa;
        Ok(cfm_per_ft2_to_m3_per_s_per_m2(adjusted_cfm_per_ft2) * envelope_area)
    }

    /// Replace every space's infiltration with the baseline rate and remove
    /// space-type infiltration. `None` when the model has no envelope or no
    /// exterior walls to carry the flow.
    pub fn apply_infiltration_standard(&self, model: &mut Model) -> RuleResult<Option<InfiltrationSummary>> {
        let table = self.prm_table("apply_infiltration_standard")?;

        if !model.effective_leakage_areas.is_empty() {
            tracing::error!(
                count = model.effective_leakage_areas.len(),
                "effective leakage area infiltration cannot be used with PRM rules"
            );
        }

        let envelope_area = building_envelope_area(model);
        if envelope_area == 0.0 {
            tracing::warn!("building envelope area is 0 m2, no infiltration added");
            return Ok(None);
        }

        let proposed = self.current_building_envelope_infiltration_at_75pa(model, envelope_area)?;
        tracing::info!(i75 = proposed, "proposed model leakage at 75 Pa (m3/s per m2 envelope)");

        let total_flow = self.adjusted_building_envelope_infiltration(envelope_area)?;
        let proposed_method = get_infiltration_method(model);
        let coefficients = get_infiltration_coefficients(model, table.default_infiltration_coefficients)
            .unwrap_or(table.default_infiltration_coefficients);

        let wall_area: f64 = model
            .spaces
            .iter()
            .map(|s| s.exterior_wall_area() * model.space_multiplier(s))
            .sum();
        if wall_area <= 0.0 {
            tracing::warn!("model has no exterior walls, no infiltration added");
            return Ok(None);
        }
        let rate = total_flow / wall_area;

        let schedules: Vec<_> = model
            .spaces
            .iter()
            .map(|s| representative_infiltration(model, s).and_then(|i| i.schedule))
            .collect();

        let mut spaces = 0;
        for (space, schedule) in model.spaces.iter_mut().zip(schedules) {
            space.infiltration.clear();
            if space.exterior_wall_area() <= 0.0 {
                continue;
            }
            let mut infil =
                Infiltration::per_exterior_wall_area(format!("{} Infiltration", space.name), rate, coefficients);
            infil.schedule = schedule;
            space.infiltration.push(infil);
            spaces += 1;
        }
        for space_type in &mut model.space_types {
            space_type.infiltration.clear();
        }

        tracing::info!(
            envelope_area,
            total_flow,
            rate,
            spaces,
            "applied baseline infiltration"
        );
        Ok(Some(InfiltrationSummary {
            envelope_area,
            proposed_leakage_at_75pa: proposed,
            total_flow,
            proposed_method,
            flow_per_exterior_wall_area: rate,
            coefficients,
            spaces,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prm_core::units::ft2_to_m2;
    use prm_core::Template;
    use prm_model::{EffectiveLeakageArea, SpaceType, Surface, SurfaceType};
    use prm_standards::StandardsData;

    use crate::config::RuleConfig;

    fn surface(t: SurfaceType, b: OutsideBoundary, area: f64) -> Surface {
        Surface {
            name: "s".into(),
            surface_type: t,
            outside_boundary: b,
            gross_area: area,
            sub_surfaces: Vec::new(),
        }
    }

    fn two_space_model() -> Model {
        let mut model = Model::new("B");
        let mut plenum = Space::new("Plenum", 100.0, 100.0);
        plenum.conditioning = ConditioningCategory::Unconditioned;
        plenum.surfaces.push(surface(SurfaceType::Wall, OutsideBoundary::Outdoors, 40.0));
        let plenum_id = model.add_space(plenum);

        let mut office = Space::new("Office", 100.0, 300.0);
        office.surfaces = vec![
            surface(SurfaceType::Wall, OutsideBoundary::Outdoors, 120.0),
            surface(SurfaceType::Floor, OutsideBoundary::Ground, 100.0),
            surface(SurfaceType::RoofCeiling, OutsideBoundary::Surface { adjacent_space: plenum_id }, 100.0),
            surface(SurfaceType::Wall, OutsideBoundary::Adiabatic, 50.0),
        ];
        office.infiltration.push(Infiltration::per_floor_area("Old", 0.0003));
        model.add_space(office);
        model
    }

    #[test]
    fn test_envelope_area() {
        let model = two_space_model();
        assert_eq!(building_envelope_area(&model), 320.0);
    }

    #[test]
    fn test_method_and_coefficients() {
        let mut model = two_space_model();
        assert_eq!(get_infiltration_method(&model), Some(InfiltrationMethod::FlowPerArea));
        assert_eq!(
            get_infiltration_coefficients(&model, [0.0, 0.0, 0.224, 0.0]),
            Some(Infiltration::DEFAULT_COEFFICIENTS)
        );

        let mut st = SpaceType::new("Plenum Type");
        st.infiltration.push(Infiltration::per_exterior_wall_area("ST", 0.0001, [0.5, 0.0, 0.1, 0.0]));
        let st_id = model.add_space_type(st);
        model.spaces[0].space_type = Some(st_id);
        assert_eq!(get_infiltration_method(&model), Some(InfiltrationMethod::FlowPerArea));
        assert_eq!(
            get_infiltration_coefficients(&model, [0.0, 0.0, 0.224, 0.0]),
            Some([0.0, 0.0, 0.224, 0.0])
        );
    }

    #[test]
    fn test_adjusted_infiltration() {
        let data = StandardsData::new();
        let rules = RuleSet::new(RuleConfig::new(Template::Prm2019), &data).unwrap();
        let env = ft2_to_m2(10_000.0);
        let total = rules.adjusted_building_envelope_infiltration(env).unwrap();
        let expected = prm_core::units::cfm_to_m3_per_s(1120.0);
        assert!((total - expected).abs() < 1e-9);
    }

    #[test]
    fn test_apply_distributes_by_exterior_wall_area() {
        let data = StandardsData::new();
        let rules = RuleSet::new(RuleConfig::new(Template::Prm2019), &data).unwrap();
        let mut model = two_space_model();
        let mut st = SpaceType::new("Office Type");
        st.infiltration.push(Infiltration::per_floor_area("ST infil", 0.0002));
        model.add_space_type(st);
        model.effective_leakage_areas.push(EffectiveLeakageArea {
            name: "ELA".into(),
            space: model.spaces[1].id,
        });

        let summary = rules.apply_infiltration_standard(&mut model).unwrap().unwrap();
        assert_eq!(summary.envelope_area, 320.0);
        assert_eq!(summary.spaces, 2);
        assert!((summary.flow_per_exterior_wall_area * 160.0 - summary.total_flow).abs() < 1e-12);
        for space in &model.spaces {
            assert_eq!(space.infiltration.len(), 1);
            assert_eq!(space.infiltration[0].method, InfiltrationMethod::FlowPerExteriorWallArea);
            assert_eq!(space.infiltration[0].name, format!("{} Infiltration", space.name));
        }
        assert!(model.space_types[0].infiltration.is_empty());
    }

    #[test]
    fn test_apply_without_envelope_is_noop() {
        let data = StandardsData::new();
        let rules = RuleSet::new(RuleConfig::new(Template::Prm2019), &data).unwrap();
        let mut model = Model::new("B");
        model.add_space(Space::new("Core", 100.0, 300.0));
        let before = model.clone();
        assert!(rules.apply_infiltration_standard(&mut model).unwrap().is_none());
        assert_eq!(model, before);
    }
}
