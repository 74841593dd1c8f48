//! Year-end promotion DTOs and run history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::grade::GradeLevel;
use crate::ids::{PromotionRunId, StudentId, UserId};
use crate::outcomes::{LineError, PromotionOutcome};
use crate::students::StudentIdentity;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PromotionRequest {
    /// Calendar year of the rentrée being entered
    #[validate(range(min = 2000, max = 2100))]
    #[schema(example = 2025)]
    pub school_year: i32,
    /// Students repeating their current level
    #[validate(nested)]
    #[serde(default)]
    pub repeating: Vec<StudentIdentity>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ValidateRepeatingRequest {
    #[validate(length(min = 1), nested)]
    pub repeating: Vec<StudentIdentity>,
}

/// A repeating identity matched to a stored student.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResolvedRepeating {
    pub student: StudentIdentity,
    pub student_id: StudentId,
    /// `None` when the student is enrolled in no class
    pub grade_level: Option<GradeLevel>,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct RepeatingValidation {
    pub matched: Vec<ResolvedRepeating>,
    pub unknown: Vec<StudentIdentity>,
}

/// Persisted record of one promotion run. At most one per school year.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PromotionRun {
    pub id: PromotionRunId,
    pub school_year: i32,
    pub triggered_by: Option<UserId>,
    pub promoted_count: i32,
    pub retained_count: i32,
    pub graduated_count: i32,
    pub unknown_count: i32,
    pub failed_count: i32,
    pub indeterminate_count: i32,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PromotionResponse {
    pub run: PromotionRun,
    pub outcome: PromotionOutcome,
    /// Lines of an uploaded repeating file that could not be read
    pub rejected: Vec<LineError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_promotion_request_validation() {
        let valid = PromotionRequest {
            school_year: 2025,
            repeating: vec![StudentIdentity::new(
                "Petit",
                "Jules",
                NaiveDate::from_ymd_opt(2017, 6, 3).unwrap(),
            )],
        };
        assert!(valid.validate().is_ok());

        let bad_year = PromotionRequest {
            school_year: 1815,
            repeating: vec![],
        };
        assert!(bad_year.validate().is_err());
    }

    #[test]
    fn test_repeating_defaults_to_empty() {
        let request: PromotionRequest = serde_json::from_str(r#"{"school_year": 2025}"#).unwrap();
        assert!(request.repeating.is_empty());
    }
}
