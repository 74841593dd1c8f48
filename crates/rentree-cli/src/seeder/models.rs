//! Seeding configuration.

use chrono::NaiveDate;

/// Seed data for a staff account.
pub struct StaffSeed {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: &'static str,
}

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub students: usize,
    pub rentree: NaiveDate,
    /// Youngest generated age, in whole years at the rentrée
    pub min_age: i32,
    /// Oldest generated age, in whole years at the rentrée
    pub max_age: i32,
}

impl SeedConfig {
    /// Children aged 2 to 10, so the préinscrits list is not empty.
    pub fn new(students: usize, rentree: NaiveDate) -> Self {
        Self {
            students,
            rentree,
            min_age: 2,
            max_age: 10,
        }
    }

    pub fn with_ages(mut self, min_age: i32, max_age: i32) -> Self {
        self.min_age = min_age.min(max_age);
        self.max_age = max_age.max(min_age);
        self
    }
}
