//! # Non-Mechanically Cooled Systems
//!
//! An air loop is non-mechanically cooled when it has no cooling coil and
//! cools with an evaporative cooler or an outdoor-air economizer. Such
//! loops, and every zone they serve, are modeled in the baseline without
//! mechanical cooling.

use std::collections::BTreeSet;

use serde::Serialize;

use prm_core::{AirLoopId, ThermalZoneId};
use prm_model::Model;

use crate::air_loop::{include_cooling_coil, include_economizer, include_evaporative_cooler};

/// Loops and zones served without mechanical cooling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NonMechanicallyCooled {
    pub air_loops: BTreeSet<AirLoopId>,
    pub thermal_zones: BTreeSet<ThermalZoneId>,
}

impl NonMechanicallyCooled {
    pub fn contains_air_loop(&self, id: AirLoopId) -> bool {
        self.air_loops.contains(&id)
    }

    pub fn contains_zone(&self, id: ThermalZoneId) -> bool {
        self.thermal_zones.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.air_loops.is_empty()
    }
}

/// Identify non-mechanically cooled air loops and the zones they serve.
pub fn identify_non_mechanically_cooled_systems(model: &Model) -> NonMechanicallyCooled {
    let mut nmc = NonMechanicallyCooled::default();
    for air_loop in &model.air_loops {
        if include_cooling_coil(air_loop) {
            continue;
        }
        if !(include_evaporative_cooler(air_loop) || include_economizer(air_loop)) {
            continue;
        }
        tracing::debug!(air_loop = %air_loop.name, "non-mechanically cooled air loop");
        nmc.air_loops.insert(air_loop.id);
        nmc.thermal_zones.extend(air_loop.thermal_zones());
    }
    tracing::info!(
        air_loops = nmc.air_loops.len(),
        thermal_zones = nmc.thermal_zones.len(),
        "identified non-mechanically cooled systems"
    );
    nmc
}

#[cfg(test)]
mod tests {
    use super::*;
    use prm_model::{
        AirLoop, AirTerminalKind, ControllerOutdoorAir, CoolingCoil, CoolingCoilKind, EconomizerType,
        OutdoorAirSystem, SupplyComponent, ThermalZone,
    };

    fn oa_system(econ: EconomizerType) -> OutdoorAirSystem {
        OutdoorAirSystem {
            name: "OA".into(),
            controller: ControllerOutdoorAir::new("OA Controller", econ),
            components: Vec::new(),
        }
    }

    #[test]
    fn test_identification() {
        let mut model = Model::new("B");
        let z1 = model.add_thermal_zone(ThermalZone::new("Z1"));
        let z2 = model.add_thermal_zone(ThermalZone::new("Z2"));
        let z3 = model.add_thermal_zone(ThermalZone::new("Z3"));
        let z4 = model.add_thermal_zone(ThermalZone::new("Z4"));

        let mut evap = AirLoop::new("Evap");
        evap.supply_components.push(SupplyComponent::EvaporativeCooler { name: "EC".into() });
        evap.add_branch(z1, AirTerminalKind::ConstantVolumeNoReheat);
        let evap = model.add_air_loop(evap);

        let mut econ = AirLoop::new("Econ");
        econ.outdoor_air_system = Some(oa_system(EconomizerType::FixedDryBulb));
        econ.add_branch(z2, AirTerminalKind::ConstantVolumeNoReheat);
        let econ = model.add_air_loop(econ);

        let mut dx = AirLoop::new("DX");
        dx.outdoor_air_system = Some(oa_system(EconomizerType::FixedDryBulb));
        dx.supply_components.push(SupplyComponent::CoolingCoil(CoolingCoil {
            name: "DX".into(),
            kind: CoolingCoilKind::DxSingleSpeed,
            rated_capacity: None,
            autosized_capacity: None,
        }));
        dx.add_branch(z3, AirTerminalKind::ConstantVolumeNoReheat);
        model.add_air_loop(dx);

        let mut heat_only = AirLoop::new("Heat only");
        heat_only.outdoor_air_system = Some(oa_system(EconomizerType::NoEconomizer));
        heat_only.add_branch(z4, AirTerminalKind::ConstantVolumeNoReheat);
        model.add_air_loop(heat_only);

        let nmc = identify_non_mechanically_cooled_systems(&model);
        assert_eq!(nmc.air_loops, BTreeSet::from([evap, econ]));
        assert!(nmc.contains_zone(z1));
        assert!(nmc.contains_zone(z2));
        assert!(!nmc.contains_zone(z3));
        assert!(!nmc.contains_zone(z4));
    }

    #[test]
    fn test_empty_model() {
        assert!(identify_non_mechanically_cooled_systems(&Model::new("B")).is_empty());
    }
}
