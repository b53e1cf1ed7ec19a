//! # prm-standards — Standards Tables and Prototype Data
//!
//! The lookup layer every compliance rule reads from: named tables of JSON
//! records selected by field criteria, user-supplied override tables, and
//! the prototype building registry.
//!
//! ## Architecture
//!
//! - [`data`]: table storage, `find_object` search, directory loading
//!   (JSON tables and CSV user data).
//! - [`userdata`]: typed `userdata_*` tables with case-insensitive naming.
//! - [`prototype`]: `BuildingType`, `PrototypeConfig`, and the data-driven
//!   `PrototypeRegistry`.
//! - [`validation`]: pre-run checks over a loaded database.
//!
//! ## Crate Policy
//!
//! - A lookup miss is `None`, never an error. Callers decide whether a miss
//!   means "no requirement applies".
//! - Only prototype resolution fails hard.

pub mod data;
pub mod error;
pub mod prototype;
pub mod userdata;
pub mod validation;

pub use data::{find_object, SearchCriteria, StandardsData};
pub use error::{StandardsError, StandardsResult};
pub use prototype::{BuildingType, Prototype, PrototypeConfig, PrototypeInput, PrototypeRegistry};
pub use userdata::{
    flag_is_true, names_match, UserData, UserDataAirLoop, UserDataBuilding, UserDataSpace,
    UserDataThermalZone, UserDataWaterUseEquipment, UserFlag,
};
pub use validation::{validate_standards, StandardsValidationResult};
