//! Fake data for development databases.
//!
//! Students are generated in parallel with Rayon and imported through
//! [`rentree_roster::enroll`], so they land in the same classes a real import
//! would give them.

pub mod models;
pub mod staff;
pub mod students;

pub use models::{SeedConfig, StaffSeed};
pub use staff::{create_user, generate_staff, insert_staff_batch, seed_staff};
pub use students::{generate_students, seed_students};
