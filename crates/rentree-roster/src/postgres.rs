//! PostgreSQL [`RosterStore`].

use std::collections::BTreeMap;

use async_trait::async_trait;
use rentree_models::{ClassRoster, GradeLevel, RosterId, Student, StudentId, StudentIdentity};
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use tracing::instrument;

use crate::store::{Roster, RosterStore, StoreError};

/// Store holding one pooled connection for the length of an operation.
///
/// The connection goes back to the pool when the store is dropped.
pub struct PgRosterStore {
    conn: PoolConnection<Postgres>,
}

impl PgRosterStore {
    pub async fn acquire(pool: &PgPool) -> Result<Self, StoreError> {
        Ok(Self {
            conn: pool.acquire().await?,
        })
    }
}

fn map_write_error(e: sqlx::Error, what: impl FnOnce() -> String) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return StoreError::Conflict(what());
    }
    StoreError::Database(e)
}

#[async_trait]
impl RosterStore for PgRosterStore {
    #[instrument(skip(self))]
    async fn list_rosters(&mut self) -> Result<Vec<Roster>, StoreError> {
        let rosters = sqlx::query_as::<_, ClassRoster>(
            "SELECT id, grade_level, created_at FROM class_rosters",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        let memberships = sqlx::query_as::<_, (RosterId, StudentId)>(
            "SELECT roster_id, student_id FROM roster_memberships",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        let mut by_grade: BTreeMap<GradeLevel, Roster> = rosters
            .into_iter()
            .map(|r| {
                (
                    r.grade_level,
                    Roster {
                        id: r.id,
                        grade_level: r.grade_level,
                        students: Default::default(),
                    },
                )
            })
            .collect();

        for (roster_id, student_id) in memberships {
            if let Some(roster) = by_grade.values_mut().find(|r| r.id == roster_id) {
                roster.students.insert(student_id);
            }
        }

        Ok(by_grade.into_values().collect())
    }

    #[instrument(skip(self))]
    async fn find_roster(&mut self, grade: GradeLevel) -> Result<Option<ClassRoster>, StoreError> {
        let roster = sqlx::query_as::<_, ClassRoster>(
            "SELECT id, grade_level, created_at FROM class_rosters WHERE grade_level = $1",
        )
        .bind(grade)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(roster)
    }

    #[instrument(skip(self))]
    async fn create_roster(&mut self, grade: GradeLevel) -> Result<ClassRoster, StoreError> {
        let roster = sqlx::query_as::<_, ClassRoster>(
            r#"INSERT INTO class_rosters (grade_level)
               VALUES ($1)
               ON CONFLICT (grade_level) DO UPDATE SET grade_level = EXCLUDED.grade_level
               RETURNING id, grade_level, created_at"#,
        )
        .bind(grade)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(roster)
    }

    #[instrument(skip(self))]
    async fn add_student_to_roster(
        &mut self,
        roster: RosterId,
        student: StudentId,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO roster_memberships (roster_id, student_id)
               VALUES ($1, $2)
               ON CONFLICT (roster_id, student_id) DO NOTHING"#,
        )
        .bind(roster)
        .bind(student)
        .execute(&mut *self.conn)
        .await
        .map_err(|e| {
            map_write_error(e, || {
                format!("student {student} is already enrolled in another roster")
            })
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_student_from_roster(
        &mut self,
        roster: RosterId,
        student: StudentId,
    ) -> Result<(), StoreError> {
        let result =
            sqlx::query("DELETE FROM roster_memberships WHERE roster_id = $1 AND student_id = $2")
                .bind(roster)
                .bind(student)
                .execute(&mut *self.conn)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!(
                "student {student} in roster {roster}"
            )));
        }
        Ok(())
    }

    /// Single `UPDATE`: the student is in exactly one of the two rosters
    /// whatever happens.
    #[instrument(skip(self))]
    async fn move_student(
        &mut self,
        student: StudentId,
        from: RosterId,
        to: RosterId,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"UPDATE roster_memberships
               SET roster_id = $3, enrolled_at = NOW()
               WHERE student_id = $1 AND roster_id = $2"#,
        )
        .bind(student)
        .bind(from)
        .bind(to)
        .execute(&mut *self.conn)
        .await
        .map_err(|e| map_write_error(e, || format!("student {student} is already in roster {to}")))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!(
                "student {student} in roster {from}"
            )));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn enrollments_of(&mut self, student: StudentId) -> Result<Vec<ClassRoster>, StoreError> {
        let rosters = sqlx::query_as::<_, ClassRoster>(
            r#"SELECT r.id, r.grade_level, r.created_at
               FROM class_rosters r
               JOIN roster_memberships m ON m.roster_id = r.id
               WHERE m.student_id = $1"#,
        )
        .bind(student)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rosters)
    }

    #[instrument(skip(self), fields(student = %identity))]
    async fn find_student(
        &mut self,
        identity: &StudentIdentity,
    ) -> Result<Option<Student>, StoreError> {
        let student = sqlx::query_as::<_, Student>(
            r#"SELECT id, last_name, first_name, birth_date, created_at
               FROM students
               WHERE last_name = $1 AND first_name = $2 AND birth_date = $3"#,
        )
        .bind(&identity.last_name)
        .bind(&identity.first_name)
        .bind(identity.birth_date)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(student)
    }

    #[instrument(skip(self), fields(student = %identity))]
    async fn create_student(&mut self, identity: &StudentIdentity) -> Result<Student, StoreError> {
        sqlx::query_as::<_, Student>(
            r#"INSERT INTO students (last_name, first_name, birth_date)
               VALUES ($1, $2, $3)
               RETURNING id, last_name, first_name, birth_date, created_at"#,
        )
        .bind(&identity.last_name)
        .bind(&identity.first_name)
        .bind(identity.birth_date)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| map_write_error(e, || format!("student {identity} already exists")))
    }

    #[instrument(skip(self))]
    async fn list_students(&mut self) -> Result<Vec<Student>, StoreError> {
        let students = sqlx::query_as::<_, Student>(
            r#"SELECT id, last_name, first_name, birth_date, created_at
               FROM students
               ORDER BY last_name, first_name, birth_date"#,
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(students)
    }
}
