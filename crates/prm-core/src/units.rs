//! # Unit Conversion
//!
//! Standards tables are published in IP units while the building model is
//! stored in SI. Every crossing between the two goes through this module.

/// Cubic feet per minute in one cubic metre per second.
pub const CFM_PER_M3_PER_S: f64 = 2_118.880_003_289_315;

/// Square feet in one square metre.
pub const FT2_PER_M2: f64 = 10.763_910_416_709_722;

/// Btu per hour in one watt.
pub const BTU_PER_HR_PER_W: f64 = 3.412_141_633_127_942;

/// Volumetric flow, m³/s to cfm.
pub fn m3_per_s_to_cfm(v: f64) -> f64 {
    v * CFM_PER_M3_PER_S
}

/// Volumetric flow, cfm to m³/s.
pub fn cfm_to_m3_per_s(v: f64) -> f64 {
    v / CFM_PER_M3_PER_S
}

/// Area, m² to ft².
pub fn m2_to_ft2(a: f64) -> f64 {
    a * FT2_PER_M2
}

/// Area, ft² to m².
pub fn ft2_to_m2(a: f64) -> f64 {
    a / FT2_PER_M2
}

/// Power, W to Btu/h.
pub fn w_to_btu_per_hr(p: f64) -> f64 {
    p * BTU_PER_HR_PER_W
}

/// Temperature, °F to °C.
pub fn f_to_c(t: f64) -> f64 {
    (t - 32.0) * 5.0 / 9.0
}

/// Temperature, °C to °F.
pub fn c_to_f(t: f64) -> f64 {
    t * 9.0 / 5.0 + 32.0
}

/// Flux, cfm/ft² to m³/s per m².
pub fn cfm_per_ft2_to_m3_per_s_per_m2(v: f64) -> f64 {
    v / (CFM_PER_M3_PER_S / FT2_PER_M2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_fixed_points() {
        assert!((f_to_c(32.0)).abs() < 1e-12);
        assert!((f_to_c(212.0) - 100.0).abs() < 1e-12);
        assert!((c_to_f(22.2) - 71.96).abs() < 1e-9);
    }

    #[test]
    fn test_unit_heater_supply_temperature() {
        assert!((f_to_c(105.0) - 40.555_555).abs() < 1e-5);
    }

    #[test]
    fn test_flow_roundtrip() {
        let cfm = 3000.0;
        assert!((m3_per_s_to_cfm(cfm_to_m3_per_s(cfm)) - cfm).abs() < 1e-9);
    }

    #[test]
    fn test_capacity_threshold() {
        // 65,000 Btu/h is roughly 19.05 kW.
        assert!(w_to_btu_per_hr(19_040.0) < 65_000.0);
        assert!(w_to_btu_per_hr(19_060.0) > 65_000.0);
    }

    #[test]
    fn test_infiltration_flux() {
        // 1 cfm/ft² is about 0.00508 m³/s/m².
        assert!((cfm_per_ft2_to_m3_per_s_per_m2(1.0) - 0.005_08).abs() < 1e-5);
    }
}
