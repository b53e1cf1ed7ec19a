//! Loading a project standards directory layered over the bundled tables.

use prm_core::Template;
use prm_standards::{
    flag_is_true, validate_standards, BuildingType, PrototypeConfig, PrototypeRegistry,
    SearchCriteria, StandardsData, UserData,
};

fn project_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("userdata_airloop_hvac.csv"),
        "name,dcv_exception_airloop\nVAV_1,TRUE\nVAV_2,FALSE\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("userdata_building.csv"),
        "name,building_type_for_hvac,building_type_for_wwr,building_type_for_swh\nCampus,retail,office,healthcare\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("prototype_inputs.json"),
        r#"{"prototype_inputs": [{"template": "90.1-2007", "building_type": "LargeHotel", "floor_area_m2": 12000.0, "number_of_stories": 6, "geometry": "custom.osm"}]}"#,
    )
    .unwrap();
    dir
}

fn layered() -> StandardsData {
    let dir = project_dir();
    let mut data = StandardsData::load_dir(dir.path()).unwrap();
    data.extend(StandardsData::bundled().unwrap());
    data
}

#[test]
fn project_rows_take_precedence() {
    let registry = PrototypeRegistry::from_data(&layered()).unwrap();
    let proto = registry
        .resolve(&PrototypeConfig {
            template: Template::Ashrae2007,
            building_type: BuildingType::LargeHotel,
        })
        .unwrap();
    assert_eq!(proto.input.floor_area_m2, 12000.0);
    assert_eq!(proto.input.extra["geometry"], "custom.osm");
}

#[test]
fn csv_user_data_decodes() {
    let ud = UserData::from_standards(&layered()).unwrap();
    assert!(flag_is_true(ud.air_loop("vav_1").unwrap().dcv_exception_airloop.as_ref()));
    assert!(!flag_is_true(ud.air_loop("VAV_2").unwrap().dcv_exception_airloop.as_ref()));
    let b = ud.building("campus").unwrap();
    assert_eq!(b.building_type_for_swh.as_deref(), Some("healthcare"));
}

#[test]
fn bundled_lookups_survive_layering() {
    let data = layered();
    let c = SearchCriteria::new()
        .with("template", "90.1-2019")
        .with("climate_zone", "ASHRAE 169-2013-4B");
    let row = data.find_object("economizers", &c).unwrap();
    assert_eq!(row["fixed_dry_bulb_high_limit_shutoff_temp"], 75.0);
}

#[test]
fn layered_data_validates() {
    let result = validate_standards(&layered());
    assert!(result.is_valid, "errors: {:?}", result.errors);
}

#[test]
fn missing_directory_is_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(StandardsData::load_dir(&dir.path().join("absent")).is_err());
}
