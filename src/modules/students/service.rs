use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use rentree_core::AppError;
use rentree_roster::{PgRosterStore, enroll, parse_csv};

use super::model::{ImportOutcome, StudentIdentity, StudentWithGrade, UploadOutcome};
use crate::metrics::track_import;
use crate::modules::store_error;

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn list_students(db: &PgPool) -> Result<Vec<StudentWithGrade>, AppError> {
        let students = sqlx::query_as::<_, StudentWithGrade>(
            r#"SELECT s.id, s.last_name, s.first_name, s.birth_date, r.grade_level, s.created_at
               FROM students s
               LEFT JOIN roster_memberships m ON m.student_id = s.id
               LEFT JOIN class_rosters r ON r.id = m.roster_id
               ORDER BY s.last_name, s.first_name, s.birth_date"#,
        )
        .fetch_all(db)
        .await?;

        Ok(students)
    }

    /// Creates the new students and places them in classes by age at `rentree`.
    #[instrument(skip(db, records), fields(records = records.len(), %rentree))]
    pub async fn import_students(
        db: &PgPool,
        records: &[StudentIdentity],
        rentree: NaiveDate,
        source: &'static str,
    ) -> Result<ImportOutcome, AppError> {
        let mut store = PgRosterStore::acquire(db).await.map_err(store_error)?;
        let outcome = enroll(&mut store, records, rentree).await;
        track_import(source, &outcome);
        Ok(outcome)
    }

    #[instrument(skip(db, content), fields(bytes = content.len(), %rentree))]
    pub async fn import_csv(
        db: &PgPool,
        content: &str,
        rentree: NaiveDate,
    ) -> Result<UploadOutcome, AppError> {
        let parsed = parse_csv(content).map_err(AppError::bad_request)?;
        let outcome = Self::import_students(db, &parsed.records, rentree, "csv").await?;

        Ok(UploadOutcome {
            outcome,
            rejected: parsed.rejected,
        })
    }
}
