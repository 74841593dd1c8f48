//! # Rentree CLI
//!
//! Administration and seeding utilities for Rentree.
//!
//! ## Usage
//!
//! ```ignore
//! use rentree_cli::seeder::{seed_students, SeedConfig};
//! use rentree_roster::PgRosterStore;
//!
//! let mut store = PgRosterStore::acquire(&pool).await?;
//! seed_students(&mut store, &SeedConfig::new(200, rentree)).await;
//! ```

pub mod preview;
pub mod seeder;
