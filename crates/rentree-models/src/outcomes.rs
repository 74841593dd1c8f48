//! Reports returned by imports and promotion runs.
//!
//! Both procedures keep going when a single student fails, so their results
//! carry per-student lists rather than a single success flag.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::grade::GradeLevel;
use crate::ids::StudentId;
use crate::students::StudentIdentity;

/// A student placed in a class by an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EnrolledStudent {
    pub student_id: StudentId,
    pub grade_level: GradeLevel,
}

/// A record an import could not store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImportFailure {
    pub student: StudentIdentity,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImportOutcome {
    /// Students created by this import
    pub created: Vec<StudentId>,
    /// Newly created students placed in a class
    pub enrolled: Vec<EnrolledStudent>,
    /// Records matching an existing student; skipped
    pub duplicates: Vec<StudentIdentity>,
    /// Created students whose age maps to no grade level
    pub not_eligible: Vec<StudentId>,
    pub failed: Vec<ImportFailure>,
}

/// A student the promotion procedure could not move cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StudentFailure {
    pub student_id: StudentId,
    /// Level the student was in when the run started
    pub grade_level: GradeLevel,
    pub reason: String,
    /// Levels the student was found in after the failure
    pub found_in: Vec<GradeLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PromotionOutcome {
    /// Moved to the next level
    pub promoted: Vec<StudentId>,
    /// Repeating students left in their level
    pub retained: Vec<StudentId>,
    /// CM2 students removed from every roster
    pub graduated: Vec<StudentId>,
    /// Repeating identities matching no enrolled student
    pub unknown_repeating: Vec<StudentIdentity>,
    /// Still in their original level; nothing was written for them
    pub failed: Vec<StudentFailure>,
    /// Partially moved; need manual reconciliation
    pub indeterminate: Vec<StudentFailure>,
}

impl PromotionOutcome {
    /// Students whose end state is the expected one.
    pub fn success_count(&self) -> usize {
        self.promoted.len() + self.retained.len() + self.graduated.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.indeterminate.is_empty()
    }
}

/// A line of an uploaded file that could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LineError {
    /// 1-based line number in the uploaded file
    pub line: usize,
    pub reason: String,
}

/// Import triggered by a file upload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadOutcome {
    pub outcome: ImportOutcome,
    pub rejected: Vec<LineError>,
}
