//! Class roster models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::grade::GradeLevel;
use crate::ids::RosterId;
use crate::students::Student;

/// One class: the roster of a single grade level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClassRoster {
    pub id: RosterId,
    pub grade_level: GradeLevel,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClassRosterWithStudents {
    pub id: RosterId,
    pub grade_level: GradeLevel,
    pub student_count: usize,
    pub students: Vec<Student>,
}

impl ClassRosterWithStudents {
    pub fn new(roster: ClassRoster, students: Vec<Student>) -> Self {
        Self {
            id: roster.id,
            grade_level: roster.grade_level,
            student_count: students.len(),
            students,
        }
    }
}
