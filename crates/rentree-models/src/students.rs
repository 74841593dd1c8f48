//! Student domain models and DTOs.
//!
//! A student is identified by the triple (last name, first name, birth date).
//! The same triple is what import files carry and what the repeating list of
//! a promotion run is made of.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::grade::GradeLevel;
use crate::ids::StudentId;

/// A student stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub last_name: String,
    pub first_name: String,
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Student {
    pub fn identity(&self) -> StudentIdentity {
        StudentIdentity {
            last_name: self.last_name.clone(),
            first_name: self.first_name.clone(),
            birth_date: self.birth_date,
        }
    }
}

/// Student row joined with the class they are currently enrolled in.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StudentWithGrade {
    pub id: StudentId,
    pub last_name: String,
    pub first_name: String,
    pub birth_date: NaiveDate,
    pub grade_level: Option<GradeLevel>,
    pub created_at: DateTime<Utc>,
}

/// Deduplication key of a student.
///
/// Also the shape of one record in an import or a repeating list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Validate, ToSchema)]
pub struct StudentIdentity {
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Martin")]
    pub last_name: String,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Léa")]
    pub first_name: String,
    #[schema(example = "2019-04-12")]
    pub birth_date: NaiveDate,
}

impl StudentIdentity {
    /// Builds an identity with surrounding whitespace removed from the names.
    pub fn new(last_name: &str, first_name: &str, birth_date: NaiveDate) -> Self {
        Self {
            last_name: last_name.trim().to_string(),
            first_name: first_name.trim().to_string(),
            birth_date,
        }
    }

    /// Same identity with trimmed names.
    pub fn normalized(&self) -> Self {
        Self::new(&self.last_name, &self.first_name, self.birth_date)
    }
}

impl std::fmt::Display for StudentIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.last_name, self.first_name, self.birth_date)
    }
}

/// JSON import of a list of students.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ImportStudentsDto {
    #[validate(length(min = 1), nested)]
    pub students: Vec<StudentIdentity>,
    /// Start of the school year used to place students; defaults to the
    /// configured rentrée of the current year.
    pub rentree: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RentreeQuery {
    /// Reference date, `YYYY-MM-DD`
    pub rentree: Option<NaiveDate>,
}
