//! Start-of-school-year (rentrée) configuration.
//!
//! The rentrée is the reference date used to compute a child's age when they
//! are placed in a class. Clients may send an explicit date; when they don't,
//! the service uses the configured month and day in the current calendar year.
//!
//! # Environment Variables
//!
//! - `SCHOOL_YEAR_START`: `MM-DD`, default `09-01`

use chrono::{Datelike, NaiveDate, Utc};
use std::env;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchoolYearConfig {
    pub start_month: u32,
    pub start_day: u32,
}

impl Default for SchoolYearConfig {
    fn default() -> Self {
        Self {
            start_month: 9,
            start_day: 1,
        }
    }
}

impl SchoolYearConfig {
    /// Reads `SCHOOL_YEAR_START`, falling back to 1 September when the
    /// variable is missing or is not a valid `MM-DD` day.
    pub fn from_env() -> Self {
        env::var("SCHOOL_YEAR_START")
            .ok()
            .and_then(|raw| Self::parse(&raw))
            .unwrap_or_default()
    }

    /// Parses `MM-DD`. The day must exist in a leap year, so `02-29` is
    /// accepted and falls back to 28 February in other years.
    pub fn parse(raw: &str) -> Option<Self> {
        let (month, day) = raw.trim().split_once('-')?;
        let start_month: u32 = month.parse().ok()?;
        let start_day: u32 = day.parse().ok()?;
        NaiveDate::from_ymd_opt(2000, start_month, start_day)?;

        Some(Self {
            start_month,
            start_day,
        })
    }

    /// The rentrée of the school year starting in `year`.
    pub fn rentree_for(&self, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, self.start_month, self.start_day)
            .or_else(|| NaiveDate::from_ymd_opt(year, self.start_month, self.start_day - 1))
            .unwrap_or(NaiveDate::MIN)
    }

    /// The rentrée of the current calendar year.
    pub fn current_rentree(&self) -> NaiveDate {
        self.rentree_for(Utc::now().year())
    }
}
