//! # prm-core — Foundational Types for the PRM Compliance Stack
//!
//! This crate is the bedrock of the workspace. It defines the type-system
//! primitives every rule module keys its lookups on. Every other crate in the
//! workspace depends on `prm-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Parsed climate zones.** `ClimateZone` is parsed once from its ASHRAE 169
//!    designation (`"ASHRAE 169-2013-5A"`). Rule code branches on the thermal
//!    number and moisture regime, never on raw strings.
//!
//! 2. **Single `Template` enum.** One definition of the code editions, exhaustive
//!    `match` everywhere. Adding an edition forces every rule table to handle it.
//!
//! 3. **Explicit unit conversion.** Standards tables are in IP units and the
//!    model is in SI. All crossings go through [`units`].
//!
//! 4. **Newtype identifiers for model objects.** `SpaceId`, `ThermalZoneId`,
//!    `AirLoopId` and friends cannot be confused with one another.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `prm-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod climate;
pub mod error;
pub mod identity;
pub mod program;
pub mod template;
pub mod units;

pub use climate::{ClimateZone, ClimateZoneSet, Moisture};
pub use error::PrmError;
pub use identity::{
    AirLoopId, LoadId, ScheduleId, SpaceId, SpaceTypeId, ThermalZoneId, WaterUseEquipmentId,
};
pub use program::CustomProgram;
pub use template::Template;
