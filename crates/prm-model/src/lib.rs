//! # prm-model — Building Model Object Graph
//!
//! The building model the compliance rules read and rewrite: spaces and
//! their envelope, thermal zones, air loops, schedules, internal loads,
//! and the energy management objects rules inject.
//!
//! ## Crate Policy
//!
//! - Objects reference each other by typed identifiers from `prm-core`.
//! - All lookups return `Result<_, ModelError>`; nothing panics on a
//!   dangling reference.
//! - Persistence is plain serde (JSON or YAML).

pub mod ems;
pub mod error;
pub mod hvac;
pub mod loads;
pub mod model;
pub mod persist;
pub mod schedule;
pub mod space;

pub use ems::{Ems, EmsActuator, EmsProgram, EmsProgramCallingManager, EmsSensor};
pub use error::ModelError;
pub use hvac::{
    AirLoop, AirTerminal, AirTerminalKind, ControllerMechanicalVentilation, ControllerOutdoorAir,
    CoolingCoil, CoolingCoilKind, EconomizerType, FanKind, HeatingCoil, HeatingCoilKind,
    OutdoorAirSystem, SetpointManagerScheduled, SizingSystem, SupplyComponent,
    SystemOutdoorAirMethod, ThermalZone, ZoneBranch, ZoneEquipment,
};
pub use loads::{Building, LoadAmount, LoadHost, LoadKind, SpaceLoad, WaterUseEquipment};
pub use model::{Model, ALWAYS_ON_DISCRETE};
pub use persist::{load_model, save_model};
pub use schedule::{
    CompactPeriod, DesignDay, MonthDay, Schedule, ScheduleDay, ScheduleKind, ScheduleRule,
    ScheduleRuleset, TimeValue,
};
pub use space::{
    ConditioningCategory, DesignSpecificationOutdoorAir, EffectiveLeakageArea, Infiltration,
    InfiltrationMethod, OutdoorAirMethod, OutsideBoundary, Point3, Space, SpaceType, SubSurface,
    SubSurfaceType, Surface, SurfaceType,
};
