use std::collections::HashSet;

use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{error, info, instrument, warn};

use rentree_core::AppError;
use rentree_models::{PromotionRunId, UserId};
use rentree_roster::{PgRosterStore, PromotionError, RosterStore, promote, register};

use super::model::{
    LineError, PromotionOutcome, PromotionResponse, PromotionRun, RepeatingValidation,
    ResolvedRepeating, StudentIdentity,
};
use crate::metrics::track_promotion;
use crate::modules::store_error;

const RUN_COLUMNS: &str = "id, school_year, triggered_by, promoted_count, retained_count, \
     graduated_count, unknown_count, failed_count, indeterminate_count, started_at, completed_at";

fn promotion_error(err: PromotionError) -> AppError {
    match err {
        PromotionError::DuplicateEnrollment { .. } => AppError::conflict(err),
        PromotionError::Store(e) => store_error(e),
    }
}

fn count(items: usize) -> i32 {
    i32::try_from(items).unwrap_or(i32::MAX)
}

pub struct PromotionService;

impl PromotionService {
    /// Matches a repeating list against stored students without writing.
    #[instrument(skip(db, repeating), fields(repeating = repeating.len()))]
    pub async fn validate_repeating(
        db: &PgPool,
        repeating: &[StudentIdentity],
    ) -> Result<RepeatingValidation, AppError> {
        let mut store = PgRosterStore::acquire(db).await.map_err(store_error)?;
        let mut validation = RepeatingValidation::default();

        for identity in repeating {
            let identity = identity.normalized();
            match store.find_student(&identity).await.map_err(store_error)? {
                Some(student) => {
                    let grade_level = store
                        .enrollments_of(student.id)
                        .await
                        .map_err(store_error)?
                        .first()
                        .map(|r| r.grade_level);
                    validation.matched.push(ResolvedRepeating {
                        student: identity,
                        student_id: student.id,
                        grade_level,
                    });
                }
                None => validation.unknown.push(identity),
            }
        }

        Ok(validation)
    }

    /// Runs the year-end promotion for `school_year`.
    ///
    /// A `promotion_runs` row is inserted first, so a second run for the same
    /// year fails with 409. The row is removed again when the promotion stops
    /// before touching any roster.
    #[instrument(skip(db, repeating, rejected), fields(repeating = repeating.len()))]
    pub async fn run(
        db: &PgPool,
        triggered_by: UserId,
        school_year: i32,
        repeating: Vec<StudentIdentity>,
        rejected: Vec<LineError>,
    ) -> Result<PromotionResponse, AppError> {
        let run_id = Self::open_run(db, school_year, triggered_by).await?;

        let outcome = match Self::promote_rosters(db, &repeating).await {
            Ok(outcome) => outcome,
            Err(err) => {
                if let Err(e) = sqlx::query("DELETE FROM promotion_runs WHERE id = $1")
                    .bind(run_id)
                    .execute(db)
                    .await
                {
                    error!(%run_id, error = %e, "Could not release promotion run");
                }
                return Err(err);
            }
        };

        let run = Self::close_run(db, run_id, &outcome).await?;
        track_promotion(&outcome);

        if outcome.is_clean() {
            info!(school_year, promoted = outcome.promoted.len(), "Promotion completed");
        } else {
            warn!(
                school_year,
                failed = outcome.failed.len(),
                indeterminate = outcome.indeterminate.len(),
                "Promotion completed with students to reconcile"
            );
        }

        Ok(PromotionResponse {
            run,
            outcome,
            rejected,
        })
    }

    #[instrument(skip(db))]
    pub async fn list_runs(db: &PgPool) -> Result<Vec<PromotionRun>, AppError> {
        let runs = sqlx::query_as::<_, PromotionRun>(&format!(
            "SELECT {RUN_COLUMNS} FROM promotion_runs ORDER BY school_year DESC"
        ))
        .fetch_all(db)
        .await?;

        Ok(runs)
    }

    async fn open_run(
        db: &PgPool,
        school_year: i32,
        triggered_by: UserId,
    ) -> Result<PromotionRunId, AppError> {
        sqlx::query_scalar::<_, PromotionRunId>(
            "INSERT INTO promotion_runs (school_year, triggered_by) VALUES ($1, $2) RETURNING id",
        )
        .bind(school_year)
        .bind(triggered_by)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::conflict(anyhow!(
                    "Promotion for school year {} has already been run",
                    school_year
                ));
            }
            AppError::from(e)
        })
    }

    /// Registers repeating students the school does not know yet, then
    /// promotes every roster. The registered students are enrolled nowhere
    /// and come back as unknown repeating identities.
    async fn promote_rosters(
        db: &PgPool,
        repeating: &[StudentIdentity],
    ) -> Result<PromotionOutcome, AppError> {
        let mut store = PgRosterStore::acquire(db).await.map_err(store_error)?;

        let registered = register(&mut store, repeating).await;
        if !registered.created.is_empty() {
            warn!(
                count = registered.created.len(),
                "Registered repeating students unknown to the school"
            );
        }

        let repeating: HashSet<StudentIdentity> =
            repeating.iter().map(StudentIdentity::normalized).collect();
        promote(&mut store, &repeating)
            .await
            .map_err(promotion_error)
    }

    async fn close_run(
        db: &PgPool,
        run_id: PromotionRunId,
        outcome: &PromotionOutcome,
    ) -> Result<PromotionRun, AppError> {
        let run = sqlx::query_as::<_, PromotionRun>(&format!(
            r#"UPDATE promotion_runs
               SET promoted_count = $2, retained_count = $3, graduated_count = $4,
                   unknown_count = $5, failed_count = $6, indeterminate_count = $7,
                   completed_at = NOW()
               WHERE id = $1
               RETURNING {RUN_COLUMNS}"#
        ))
        .bind(run_id)
        .bind(count(outcome.promoted.len()))
        .bind(count(outcome.retained.len()))
        .bind(count(outcome.graduated.len()))
        .bind(count(outcome.unknown_repeating.len()))
        .bind(count(outcome.failed.len()))
        .bind(count(outcome.indeterminate.len()))
        .fetch_one(db)
        .await?;

        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use rentree_models::{GradeLevel, StudentId};

    #[test]
    fn test_duplicate_enrollment_is_a_conflict() {
        let err = promotion_error(PromotionError::DuplicateEnrollment {
            student_id: StudentId::new(),
            first: GradeLevel::Cp,
            second: GradeLevel::Ce1,
        });
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_count_saturates() {
        assert_eq!(count(3), 3);
        assert_eq!(count(usize::MAX), i32::MAX);
    }
}
