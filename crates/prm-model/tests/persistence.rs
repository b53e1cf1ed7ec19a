//! Save/load tests for building models.

use prm_model::{
    load_model, save_model, AirLoop, AirTerminalKind, ControllerOutdoorAir, EconomizerType,
    Infiltration, LoadAmount, LoadHost, LoadKind, Model, OutdoorAirSystem, OutsideBoundary,
    Point3, Schedule, ScheduleDay, Space, SpaceLoad, SpaceType, SubSurface, SubSurfaceType,
    Surface, SurfaceType, ThermalZone,
};

fn sample_model() -> Model {
    let mut model = Model::new("Sample Building");
    model.building.standards_building_type = Some("Office".to_string());

    let mut st = SpaceType::new("Office WholeBuilding");
    st.standards_space_type = Some("WholeBuilding - Md Office".to_string());
    st.infiltration.push(Infiltration::per_floor_area("st infil", 0.0003));
    let st = model.add_space_type(st);

    let zone = model.add_thermal_zone(ThermalZone::new("Core Zone"));

    let mut space = Space::new("Core Space", 500.0, 1500.0);
    space.space_type = Some(st);
    space.surfaces.push(Surface {
        name: "Roof".to_string(),
        surface_type: SurfaceType::RoofCeiling,
        outside_boundary: OutsideBoundary::Outdoors,
        gross_area: 500.0,
        sub_surfaces: vec![SubSurface {
            name: "Skylight 1".to_string(),
            sub_surface_type: SubSurfaceType::Skylight,
            vertices: vec![
                Point3::new(0.0, 0.0, 4.0),
                Point3::new(2.0, 0.0, 4.0),
                Point3::new(2.0, 2.0, 4.0),
                Point3::new(0.0, 2.0, 4.0),
            ],
        }],
    });
    let space = model.add_space(space);
    model.assign_space_to_zone(space, zone).unwrap();

    let sched = model
        .add_schedule(Schedule::ruleset(
            "Office Lights",
            ScheduleDay::from_pairs("Office Lights Default", &[(7.0, 0.05), (19.0, 0.9), (24.0, 0.05)]),
        ))
        .unwrap();
    let mut lights = SpaceLoad::new(
        "Core Lights",
        LoadKind::Lights,
        LoadHost::Space(space),
        LoadAmount::PerFloorArea(8.0),
    );
    lights.schedule = Some(sched);
    model.add_load(lights);

    let mut air_loop = AirLoop::new("VAV_1");
    air_loop.add_branch(zone, AirTerminalKind::VavReheat);
    air_loop.outdoor_air_system = Some(OutdoorAirSystem {
        name: "VAV_1 OA System".to_string(),
        controller: ControllerOutdoorAir::new("VAV_1 OA Controller", EconomizerType::FixedDryBulb),
        components: vec![],
    });
    model.add_air_loop(air_loop);
    model
}

#[test]
fn json_roundtrip_preserves_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    let model = sample_model();
    save_model(&model, &path).unwrap();
    let loaded = load_model(&path).unwrap();
    assert_eq!(loaded, model);
}

#[test]
fn yaml_roundtrip_preserves_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.yaml");
    let model = sample_model();
    save_model(&model, &path).unwrap();
    let loaded = load_model(&path).unwrap();
    assert_eq!(loaded, model);
}

#[test]
fn loaded_model_navigation_still_resolves() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    save_model(&sample_model(), &path).unwrap();
    let loaded = load_model(&path).unwrap();

    let zone = loaded.thermal_zone_by_name("Core Zone").unwrap();
    let spaces = loaded.zone_spaces(zone.id);
    assert_eq!(spaces.len(), 1);
    let skylight_area: f64 = spaces[0]
        .outdoor_roofs()
        .flat_map(|r| r.sub_surfaces.iter())
        .map(|ss| ss.net_area())
        .sum();
    assert!((skylight_area - 4.0).abs() < 1e-9);
    assert_eq!(loaded.zone_air_loops(zone.id)[0].name, "VAV_1");
}

#[test]
fn malformed_json_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{\"building\": 5}").unwrap();
    assert!(load_model(&path).is_err());
}
