//! Strongly-typed ID newtypes for domain entities.
//!
//! Each entity gets its own wrapper around `Uuid`, so a `RosterId` can never be
//! passed where a `StudentId` is expected.
//!
//! # Example
//!
//! ```ignore
//! use rentree_models::ids::{RosterId, StudentId};
//!
//! fn enroll(roster: RosterId, student: StudentId) { /* ... */ }
//!
//! enroll(RosterId::new(), StudentId::new());    // OK
//! // enroll(StudentId::new(), RosterId::new()); // Compile error
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Defines a `Uuid` newtype stored as a PostgreSQL `UUID` and serialized as
/// a plain UUID string.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            Serialize, Deserialize, ToSchema, sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        #[schema(value_type = String, format = "uuid")]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

define_id!(
    /// Strongly-typed ID for Student entities.
    StudentId
);

define_id!(
    /// Strongly-typed ID for ClassRoster entities.
    RosterId
);

define_id!(
    /// Strongly-typed ID for staff User entities.
    UserId
);

define_id!(
    /// Strongly-typed ID for PromotionRun records.
    PromotionRunId
);
