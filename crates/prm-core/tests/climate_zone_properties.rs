//! Property tests for climate zone parsing and unit conversion.

use prm_core::units;
use prm_core::{ClimateZone, ClimateZoneSet, Moisture};
use proptest::prelude::*;

fn any_zone() -> impl Strategy<Value = ClimateZone> {
    let sets = prop_oneof![
        Just(ClimateZoneSet::Ashrae169_2006),
        Just(ClimateZoneSet::Ashrae169_2013)
    ];
    (sets, 0usize..21).prop_map(|(set, i)| ClimateZone::all(set)[i])
}

proptest! {
    #[test]
    fn parse_of_display_is_identity(cz in any_zone()) {
        let parsed: ClimateZone = cz.to_string().parse().unwrap();
        prop_assert_eq!(parsed, cz);
    }

    #[test]
    fn code_roundtrips_through_from_code(cz in any_zone()) {
        let rebuilt = ClimateZone::from_code(cz.set(), &cz.code()).unwrap();
        prop_assert_eq!(rebuilt, cz);
    }

    #[test]
    fn marine_regime_only_in_zones_3_to_5(cz in any_zone()) {
        if cz.moisture() == Moisture::C {
            prop_assert!((3..=5).contains(&cz.number()));
        }
    }

    #[test]
    fn arbitrary_strings_never_panic(s in "\\PC*") {
        let _ = s.parse::<ClimateZone>();
    }

    #[test]
    fn temperature_conversion_roundtrips(t in -100.0f64..200.0) {
        prop_assert!((units::c_to_f(units::f_to_c(t)) - t).abs() < 1e-9);
    }

    #[test]
    fn area_conversion_roundtrips(a in 0.0f64..1.0e7) {
        let back = units::ft2_to_m2(units::m2_to_ft2(a));
        prop_assert!((back - a).abs() <= 1e-9 * a.max(1.0));
    }
}
