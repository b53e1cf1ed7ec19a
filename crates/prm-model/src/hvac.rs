//! # HVAC Objects — Thermal Zones and Air Loops
//!
//! Air-side systems as the compliance rules see them: thermal zones with
//! their zone equipment and autosized flows, and air loops with supply
//! components, zone branches (terminals), the outdoor-air system, and the
//! system sizing object.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use prm_core::{AirLoopId, ScheduleId, ThermalZoneId};

use crate::error::ModelError;

// ─── Thermal zones ──────────────────────────────────────────────────────────

/// Equipment serving a zone directly (not through an air loop).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneEquipment {
    UnitHeater,
    PackagedTerminalAirConditioner,
    PackagedTerminalHeatPump,
    FourPipeFanCoil,
    BaseboardElectric,
    BaseboardConvectiveWater,
    ExhaustFan,
}

/// A thermal zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalZone {
    pub id: ThermalZoneId,
    pub name: String,
    pub multiplier: u32,
    #[serde(default)]
    pub equipment: Vec<ZoneEquipment>,
    /// m³/s, from the sizing run.
    #[serde(default)]
    pub autosized_cooling_design_air_flow_rate: Option<f64>,
    /// m³/s, from the sizing run.
    #[serde(default)]
    pub autosized_heating_design_air_flow_rate: Option<f64>,
    /// Dual-setpoint thermostat heating schedule (°C).
    #[serde(default)]
    pub heating_setpoint_schedule: Option<ScheduleId>,
}

impl ThermalZone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ThermalZoneId::new(),
            name: name.into(),
            multiplier: 1,
            equipment: Vec::new(),
            autosized_cooling_design_air_flow_rate: None,
            autosized_heating_design_air_flow_rate: None,
            heating_setpoint_schedule: None,
        }
    }
}

// ─── Economizer and outdoor-air control ─────────────────────────────────────

/// Economizer control type of an outdoor-air controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EconomizerType {
    NoEconomizer,
    FixedDryBulb,
    FixedEnthalpy,
    DifferentialDryBulb,
    DifferentialEnthalpy,
    FixedDewPointAndDryBulb,
    ElectronicEnthalpy,
    DifferentialDryBulbAndEnthalpy,
}

impl EconomizerType {
    /// All control types in canonical order.
    pub fn all() -> &'static [EconomizerType] {
        &[
            Self::NoEconomizer,
            Self::FixedDryBulb,
            Self::FixedEnthalpy,
            Self::DifferentialDryBulb,
            Self::DifferentialEnthalpy,
            Self::FixedDewPointAndDryBulb,
            Self::ElectronicEnthalpy,
            Self::DifferentialDryBulbAndEnthalpy,
        ]
    }

    /// EnergyPlus keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoEconomizer => "NoEconomizer",
            Self::FixedDryBulb => "FixedDryBulb",
            Self::FixedEnthalpy => "FixedEnthalpy",
            Self::DifferentialDryBulb => "DifferentialDryBulb",
            Self::DifferentialEnthalpy => "DifferentialEnthalpy",
            Self::FixedDewPointAndDryBulb => "FixedDewPointAndDryBulb",
            Self::ElectronicEnthalpy => "ElectronicEnthalpy",
            Self::DifferentialDryBulbAndEnthalpy => "DifferentialDryBulbAndEnthalpy",
        }
    }
}

impl std::fmt::Display for EconomizerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EconomizerType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| ModelError::InvalidValue {
                field: "economizer_type",
                value: s.to_string(),
            })
    }
}

/// System outdoor-air method of mechanical ventilation and system sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemOutdoorAirMethod {
    ZoneSum,
    VentilationRateProcedure,
    SimplifiedProcedure,
}

/// Mechanical ventilation controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerMechanicalVentilation {
    pub demand_controlled_ventilation: bool,
    pub system_outdoor_air_method: SystemOutdoorAirMethod,
}

impl Default for ControllerMechanicalVentilation {
    fn default() -> Self {
        Self {
            demand_controlled_ventilation: false,
            system_outdoor_air_method: SystemOutdoorAirMethod::ZoneSum,
        }
    }
}

/// Outdoor-air controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerOutdoorAir {
    pub name: String,
    pub economizer_type: EconomizerType,
    /// Hard-sized minimum outdoor airflow, m³/s.
    #[serde(default)]
    pub minimum_outdoor_air_flow_rate: Option<f64>,
    /// Autosized minimum outdoor airflow, m³/s.
    #[serde(default)]
    pub autosized_minimum_outdoor_air_flow_rate: Option<f64>,
    /// °C.
    #[serde(default)]
    pub economizer_minimum_limit_dry_bulb: Option<f64>,
    /// °C.
    #[serde(default)]
    pub economizer_maximum_limit_dry_bulb: Option<f64>,
    /// J/kg.
    #[serde(default)]
    pub economizer_maximum_limit_enthalpy: Option<f64>,
    /// °C.
    #[serde(default)]
    pub economizer_maximum_limit_dewpoint: Option<f64>,
    #[serde(default)]
    pub maximum_fraction_of_outdoor_air_schedule: Option<ScheduleId>,
    #[serde(default)]
    pub mechanical_ventilation: ControllerMechanicalVentilation,
}

impl ControllerOutdoorAir {
    pub fn new(name: impl Into<String>, economizer_type: EconomizerType) -> Self {
        Self {
            name: name.into(),
            economizer_type,
            minimum_outdoor_air_flow_rate: None,
            autosized_minimum_outdoor_air_flow_rate: None,
            economizer_minimum_limit_dry_bulb: None,
            economizer_maximum_limit_dry_bulb: None,
            economizer_maximum_limit_enthalpy: None,
            economizer_maximum_limit_dewpoint: None,
            maximum_fraction_of_outdoor_air_schedule: None,
            mechanical_ventilation: ControllerMechanicalVentilation::default(),
        }
    }

    /// Hard-sized minimum OA flow, else the autosized value.
    pub fn minimum_outdoor_air_flow(&self) -> Option<f64> {
        self.minimum_outdoor_air_flow_rate
            .or(self.autosized_minimum_outdoor_air_flow_rate)
    }
}

/// Outdoor-air system of an air loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutdoorAirSystem {
    pub name: String,
    pub controller: ControllerOutdoorAir,
    /// Evaporative coolers or heat exchangers placed on the OA stream.
    #[serde(default)]
    pub components: Vec<SupplyComponent>,
}

/// Sizing:System object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingSystem {
    /// m³/s; `None` means autosize.
    #[serde(default)]
    pub design_outdoor_air_flow_rate: Option<f64>,
    pub system_outdoor_air_method: SystemOutdoorAirMethod,
}

impl Default for SizingSystem {
    fn default() -> Self {
        Self {
            design_outdoor_air_flow_rate: None,
            system_outdoor_air_method: SystemOutdoorAirMethod::ZoneSum,
        }
    }
}

// ─── Supply components ──────────────────────────────────────────────────────

/// Cooling coil technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoolingCoilKind {
    DxSingleSpeed,
    DxTwoSpeed,
    DxMultiSpeed,
    Water,
}

/// Heating coil technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeatingCoilKind {
    Water,
    Electric,
    Gas,
    DxHeatPump,
}

/// Fan control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FanKind {
    ConstantVolume,
    VariableVolume,
    OnOff,
}

/// A cooling coil.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoolingCoil {
    pub name: String,
    pub kind: CoolingCoilKind,
    /// W.
    #[serde(default)]
    pub rated_capacity: Option<f64>,
    /// W.
    #[serde(default)]
    pub autosized_capacity: Option<f64>,
}

impl CoolingCoil {
    /// Rated capacity, else the autosized value.
    pub fn capacity(&self) -> Option<f64> {
        self.rated_capacity.or(self.autosized_capacity)
    }
}

/// A heating coil.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatingCoil {
    pub name: String,
    pub kind: HeatingCoilKind,
    /// Name of the air outlet node.
    pub outlet_node: String,
}

/// Components on an air loop's supply side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "component", rename_all = "snake_case")]
pub enum SupplyComponent {
    CoolingCoil(CoolingCoil),
    HeatingCoil(HeatingCoil),
    EvaporativeCooler { name: String },
    Fan { name: String, kind: FanKind },
    /// A unitary system wrapping its own coils.
    UnitarySystem {
        name: String,
        #[serde(default)]
        cooling_coil: Option<CoolingCoil>,
        #[serde(default)]
        heating_coil: Option<HeatingCoil>,
    },
}

// ─── Terminals ──────────────────────────────────────────────────────────────

/// Air terminal type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AirTerminalKind {
    VavReheat,
    VavNoReheat,
    ConstantVolumeReheat,
    ConstantVolumeNoReheat,
    ParallelPiuReheat,
    SeriesPiuReheat,
}

impl AirTerminalKind {
    /// Whether the terminal modulates primary airflow with a damper.
    pub fn is_vav(&self) -> bool {
        matches!(self, Self::VavReheat | Self::VavNoReheat)
    }

    /// Whether the terminal has its own fan.
    pub fn is_fan_powered(&self) -> bool {
        matches!(self, Self::ParallelPiuReheat | Self::SeriesPiuReheat)
    }
}

/// An air terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirTerminal {
    pub name: String,
    pub kind: AirTerminalKind,
    /// Constant minimum air flow fraction of VAV dampers.
    #[serde(default)]
    pub minimum_damper_position: Option<f64>,
}

/// A zone served by an air loop through a terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneBranch {
    pub zone: ThermalZoneId,
    pub terminal: AirTerminal,
}

// ─── Air loops ──────────────────────────────────────────────────────────────

/// An air loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirLoop {
    pub id: AirLoopId,
    pub name: String,
    #[serde(default)]
    pub branches: Vec<ZoneBranch>,
    #[serde(default)]
    pub supply_components: Vec<SupplyComponent>,
    #[serde(default)]
    pub outdoor_air_system: Option<OutdoorAirSystem>,
    #[serde(default)]
    pub sizing_system: SizingSystem,
    /// `None` means always on.
    #[serde(default)]
    pub availability_schedule: Option<ScheduleId>,
    /// m³/s.
    #[serde(default)]
    pub design_supply_air_flow_rate: Option<f64>,
    /// m³/s.
    #[serde(default)]
    pub autosized_design_supply_air_flow_rate: Option<f64>,
    /// m³/s.
    #[serde(default)]
    pub autosized_sum_minimum_heating_air_flow_rates: Option<f64>,
}

impl AirLoop {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: AirLoopId::new(),
            name: name.into(),
            branches: Vec::new(),
            supply_components: Vec::new(),
            outdoor_air_system: None,
            sizing_system: SizingSystem::default(),
            availability_schedule: None,
            design_supply_air_flow_rate: None,
            autosized_design_supply_air_flow_rate: None,
            autosized_sum_minimum_heating_air_flow_rates: None,
        }
    }

    /// Zones served, in branch order.
    pub fn thermal_zones(&self) -> impl Iterator<Item = ThermalZoneId> + '_ {
        self.branches.iter().map(|b| b.zone)
    }

    /// Whether `zone` is served by this loop.
    pub fn serves(&self, zone: ThermalZoneId) -> bool {
        self.branches.iter().any(|b| b.zone == zone)
    }

    /// Attach `zone` through a terminal of `kind`.
    pub fn add_branch(&mut self, zone: ThermalZoneId, kind: AirTerminalKind) {
        let name = format!("{} Terminal {}", self.name, self.branches.len() + 1);
        self.branches.push(ZoneBranch {
            zone,
            terminal: AirTerminal {
                name,
                kind,
                minimum_damper_position: None,
            },
        });
    }

    /// Outdoor-air controller, if the loop has an OA system.
    pub fn controller_oa(&self) -> Option<&ControllerOutdoorAir> {
        self.outdoor_air_system.as_ref().map(|s| &s.controller)
    }

    /// Mutable outdoor-air controller, if the loop has an OA system.
    pub fn controller_oa_mut(&mut self) -> Option<&mut ControllerOutdoorAir> {
        self.outdoor_air_system.as_mut().map(|s| &mut s.controller)
    }

    /// Hard-sized design supply flow, else the autosized value.
    pub fn design_supply_air_flow(&self) -> Option<f64> {
        self.design_supply_air_flow_rate
            .or(self.autosized_design_supply_air_flow_rate)
    }

    /// Every cooling coil on the supply side, including unitary-wrapped coils.
    pub fn cooling_coils(&self) -> impl Iterator<Item = &CoolingCoil> {
        self.supply_components.iter().filter_map(|c| match c {
            SupplyComponent::CoolingCoil(coil) => Some(coil),
            SupplyComponent::UnitarySystem {
                cooling_coil: Some(coil),
                ..
            } => Some(coil),
            _ => None,
        })
    }

    /// Every heating coil on the supply side, including unitary-wrapped coils.
    pub fn heating_coils(&self) -> impl Iterator<Item = &HeatingCoil> {
        self.supply_components.iter().filter_map(|c| match c {
            SupplyComponent::HeatingCoil(coil) => Some(coil),
            SupplyComponent::UnitarySystem {
                heating_coil: Some(coil),
                ..
            } => Some(coil),
            _ => None,
        })
    }

    /// Whether any evaporative cooler sits on the supply side or the OA stream.
    pub fn has_evaporative_cooler(&self) -> bool {
        let on_supply = self
            .supply_components
            .iter()
            .any(|c| matches!(c, SupplyComponent::EvaporativeCooler { .. }));
        let on_oa = self.outdoor_air_system.as_ref().map_or(false, |oa| {
            oa.components
                .iter()
                .any(|c| matches!(c, SupplyComponent::EvaporativeCooler { .. }))
        });
        on_supply || on_oa
    }

    /// Whether the supply fan is variable volume.
    pub fn has_variable_volume_fan(&self) -> bool {
        self.supply_components.iter().any(|c| {
            matches!(
                c,
                SupplyComponent::Fan {
                    kind: FanKind::VariableVolume,
                    ..
                }
            )
        })
    }
}

/// A setpoint manager driving a node from a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetpointManagerScheduled {
    pub name: String,
    pub schedule: ScheduleId,
    pub node: String,
}
