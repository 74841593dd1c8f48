use std::collections::HashMap;

use anyhow::anyhow;
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use rentree_core::AppError;
use rentree_models::RosterId;

use super::model::{ClassRoster, ClassRosterWithStudents, GradeLevel, Student};

#[derive(FromRow)]
struct MemberRow {
    roster_id: RosterId,
    #[sqlx(flatten)]
    student: Student,
}

pub struct ClassService;

impl ClassService {
    /// Every class ordered from Petite Section to CM2, students sorted by name.
    #[instrument(skip(db))]
    pub async fn list_classes(db: &PgPool) -> Result<Vec<ClassRosterWithStudents>, AppError> {
        let mut rosters = sqlx::query_as::<_, ClassRoster>(
            "SELECT id, grade_level, created_at FROM class_rosters",
        )
        .fetch_all(db)
        .await?;
        rosters.sort_by_key(|r| r.grade_level);

        let members = sqlx::query_as::<_, MemberRow>(
            r#"SELECT m.roster_id, s.id, s.last_name, s.first_name, s.birth_date, s.created_at
               FROM roster_memberships m
               JOIN students s ON s.id = m.student_id
               ORDER BY s.last_name, s.first_name"#,
        )
        .fetch_all(db)
        .await?;

        let mut by_roster: HashMap<RosterId, Vec<Student>> = HashMap::new();
        for row in members {
            by_roster.entry(row.roster_id).or_default().push(row.student);
        }

        Ok(rosters
            .into_iter()
            .map(|roster| {
                let students = by_roster.remove(&roster.id).unwrap_or_default();
                ClassRosterWithStudents::new(roster, students)
            })
            .collect())
    }

    #[instrument(skip(db))]
    pub async fn get_class(
        db: &PgPool,
        grade: GradeLevel,
    ) -> Result<ClassRosterWithStudents, AppError> {
        let roster = sqlx::query_as::<_, ClassRoster>(
            "SELECT id, grade_level, created_at FROM class_rosters WHERE grade_level = $1",
        )
        .bind(grade)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("No students in {} yet", grade)))?;

        let students = sqlx::query_as::<_, Student>(
            r#"SELECT s.id, s.last_name, s.first_name, s.birth_date, s.created_at
               FROM roster_memberships m
               JOIN students s ON s.id = m.student_id
               WHERE m.roster_id = $1
               ORDER BY s.last_name, s.first_name"#,
        )
        .bind(roster.id)
        .fetch_all(db)
        .await?;

        Ok(ClassRosterWithStudents::new(roster, students))
    }
}
