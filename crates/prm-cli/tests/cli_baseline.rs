//! Baseline and lookup commands over model files on disk.

use prm_cli::baseline::{run_baseline_cmd, BaselineArgs};
use prm_cli::lookup::{run_econ_limits, EconLimitsArgs};
use prm_model::{
    load_model, save_model, AirLoop, AirTerminalKind, ControllerOutdoorAir, EconomizerType, Model,
    OutdoorAirSystem, OutsideBoundary, Space, Surface, SurfaceType, ThermalZone,
};

fn office() -> Model {
    let mut model = Model::new("Office");
    let zone = model.add_thermal_zone(ThermalZone::new("Core"));
    let mut space = Space::new("Core Space", 200.0, 600.0);
    space.surfaces.push(Surface {
        name: "Core Wall".into(),
        surface_type: SurfaceType::Wall,
        outside_boundary: OutsideBoundary::Outdoors,
        gross_area: 40.0,
        sub_surfaces: Vec::new(),
    });
    let space = model.add_space(space);
    model.assign_space_to_zone(space, zone).unwrap();

    let mut air_loop = AirLoop::new("VAV 1");
    air_loop.outdoor_air_system = Some(OutdoorAirSystem {
        name: "VAV 1 OA System".into(),
        controller: ControllerOutdoorAir::new("VAV 1 OA Controller", EconomizerType::FixedDryBulb),
        components: Vec::new(),
    });
    air_loop.add_branch(zone, AirTerminalKind::VavReheat);
    model.add_air_loop(air_loop);
    model
}

#[test]
fn baseline_writes_model_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("office.json");
    let config_path = dir.path().join("run.yaml");
    let report_path = dir.path().join("report.json");
    save_model(&office(), &model_path).unwrap();
    std::fs::write(
        &config_path,
        "template: 90.1-PRM-2019\nclimate_zone: ASHRAE 169-2013-5A\nbuilding_type: MediumOffice\n",
    )
    .unwrap();

    let args = BaselineArgs {
        model: model_path,
        standards: None,
        config: config_path,
        out: dir.path().join("baseline.json"),
        report: Some(report_path.clone()),
    };
    assert_eq!(run_baseline_cmd(&args).unwrap(), 0);

    let baseline = load_model(&args.out).unwrap();
    let space = baseline.spaces.iter().find(|s| s.name == "Core Space").unwrap();
    assert!(space.infiltration.iter().any(|i| i.name == "Core Space Infiltration"));

    let report: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(report_path).unwrap()).unwrap();
    assert_eq!(report["infiltration"]["spaces"], 1);
    assert_eq!(report["infiltration"]["envelope_area"], 40.0);
}

#[test]
fn econ_limits_reports_unknown_air_loop() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("office.yaml");
    save_model(&office(), &model_path).unwrap();

    let args = EconLimitsArgs {
        template: "90.1-2019".into(),
        climate_zone: "ASHRAE 169-2013-5A".into(),
        model: model_path,
        air_loop: "Missing Loop".into(),
        standards: None,
    };
    let err = run_econ_limits(&args).unwrap_err();
    assert!(format!("{err:#}").contains("Missing Loop"));
}

#[test]
fn econ_limits_for_known_air_loop() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("office.json");
    save_model(&office(), &model_path).unwrap();

    let args = EconLimitsArgs {
        template: "90.1-2019".into(),
        climate_zone: "ASHRAE 169-2013-5A".into(),
        model: model_path,
        air_loop: "VAV 1".into(),
        standards: None,
    };
    assert_eq!(run_econ_limits(&args).unwrap(), 0);
}
