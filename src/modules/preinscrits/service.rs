use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use rentree_core::AppError;
use rentree_models::is_preinscrit;
use rentree_roster::{PgRosterStore, parse_preinscrits, register};

use super::model::{Student, UploadOutcome};
use crate::metrics::track_import;
use crate::modules::store_error;

pub struct PreinscritService;

impl PreinscritService {
    /// Students still under 3 at `rentree`.
    #[instrument(skip(db))]
    pub async fn list_preinscrits(db: &PgPool, rentree: NaiveDate) -> Result<Vec<Student>, AppError> {
        let students = sqlx::query_as::<_, Student>(
            r#"SELECT id, last_name, first_name, birth_date, created_at
               FROM students
               ORDER BY birth_date DESC, last_name, first_name"#,
        )
        .fetch_all(db)
        .await?;

        Ok(students
            .into_iter()
            .filter(|s| is_preinscrit(s.birth_date, rentree))
            .collect())
    }

    /// Registers every readable line of a pre-registration file.
    #[instrument(skip(db, content), fields(bytes = content.len()))]
    pub async fn import_file(db: &PgPool, content: &str) -> Result<UploadOutcome, AppError> {
        let parsed = parse_preinscrits(content);

        let mut store = PgRosterStore::acquire(db).await.map_err(store_error)?;
        let outcome = register(&mut store, &parsed.records).await;
        track_import("preinscrits", &outcome);

        Ok(UploadOutcome {
            outcome,
            rejected: parsed.rejected,
        })
    }
}
