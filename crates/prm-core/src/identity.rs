//! # Model Object Identifiers
//!
//! Newtype wrappers for the identifiers of building-model objects.
//! These prevent accidental identifier confusion: you cannot pass a
//! `SpaceId` where a `ThermalZoneId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! object_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

object_id!(
    /// Identifier for a space (an enclosed volume with surfaces and loads).
    SpaceId,
    "space"
);
object_id!(
    /// Identifier for a space type (shared loads and standards classification).
    SpaceTypeId,
    "space-type"
);
object_id!(
    /// Identifier for a thermal zone.
    ThermalZoneId,
    "zone"
);
object_id!(
    /// Identifier for an air loop (air handling system).
    AirLoopId,
    "air-loop"
);
object_id!(
    /// Identifier for a schedule.
    ScheduleId,
    "schedule"
);
object_id!(
    /// Identifier for an internal load (people, lights, equipment).
    LoadId,
    "load"
);
object_id!(
    /// Identifier for service water use equipment.
    WaterUseEquipmentId,
    "water-use"
);
