//! # Rentree Roster
//!
//! Class placement and the year-end transition, independent of HTTP.
//!
//! - [`enroll`] / [`register`]: create students from an import and place them
//!   by age at the rentrée
//! - [`promote`]: move every roster up one grade level
//! - [`import`]: read student lists from uploaded CSV and text files
//! - [`RosterStore`]: the storage seam, with [`PgRosterStore`] and
//!   [`MemoryRosterStore`] implementations
//!
//! # Example
//!
//! ```ignore
//! use std::collections::HashSet;
//! use rentree_roster::{MemoryRosterStore, enroll, promote};
//!
//! let mut store = MemoryRosterStore::new();
//! enroll(&mut store, &records, rentree).await;
//! let outcome = promote(&mut store, &HashSet::new()).await?;
//! ```

pub mod enrollment;
pub mod import;
pub mod memory;
pub mod postgres;
pub mod promotion;
pub mod store;

pub use enrollment::{enroll, register};
pub use import::{ParseError, ParsedRecords, parse_csv, parse_preinscrits};
pub use memory::MemoryRosterStore;
pub use postgres::PgRosterStore;
pub use promotion::{PromotionError, promote};
pub use store::{Roster, RosterStore, StoreError};
