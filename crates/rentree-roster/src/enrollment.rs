//! Importing students and placing them in classes.

use chrono::NaiveDate;
use rentree_models::{
    EnrolledStudent, GradeLevel, ImportFailure, ImportOutcome, Placement, StudentId,
    StudentIdentity, assign_grade,
};
use tracing::{debug, info, instrument, warn};

use crate::store::{RosterStore, StoreError};

/// Imports `records` and places every new student by age at `rentree`.
///
/// Records matching an existing student are skipped and listed as
/// duplicates. A failure on one record never stops the others.
#[instrument(skip(store, records), fields(records = records.len(), %rentree))]
pub async fn enroll<S>(store: &mut S, records: &[StudentIdentity], rentree: NaiveDate) -> ImportOutcome
where
    S: RosterStore + ?Sized,
{
    let mut outcome = ImportOutcome::default();

    for record in records {
        let Some(student_id) = create_if_new(store, record, &mut outcome).await else {
            continue;
        };

        match assign_grade(record.birth_date, rentree) {
            Placement::Grade(level) => match place(store, student_id, level).await {
                Ok(()) => outcome.enrolled.push(EnrolledStudent {
                    student_id,
                    grade_level: level,
                }),
                Err(e) => {
                    warn!(%student_id, %level, error = %e, "Student created but not enrolled");
                    outcome.failed.push(ImportFailure {
                        student: record.normalized(),
                        reason: format!("created but not enrolled in {level}: {e}"),
                    });
                }
            },
            Placement::NotEligible => {
                debug!(%student_id, "No grade level for this age");
                outcome.not_eligible.push(student_id);
            }
        }
    }

    info!(
        created = outcome.created.len(),
        enrolled = outcome.enrolled.len(),
        duplicates = outcome.duplicates.len(),
        not_eligible = outcome.not_eligible.len(),
        failed = outcome.failed.len(),
        "Import finished"
    );

    outcome
}

/// Creates students without placing them in a class.
#[instrument(skip(store, records), fields(records = records.len()))]
pub async fn register<S>(store: &mut S, records: &[StudentIdentity]) -> ImportOutcome
where
    S: RosterStore + ?Sized,
{
    let mut outcome = ImportOutcome::default();
    for record in records {
        create_if_new(store, record, &mut outcome).await;
    }

    info!(
        created = outcome.created.len(),
        duplicates = outcome.duplicates.len(),
        failed = outcome.failed.len(),
        "Registration finished"
    );

    outcome
}

/// Returns the id of the newly created student, or `None` when the record
/// was a duplicate or could not be stored.
async fn create_if_new<S>(
    store: &mut S,
    record: &StudentIdentity,
    outcome: &mut ImportOutcome,
) -> Option<StudentId>
where
    S: RosterStore + ?Sized,
{
    let identity = record.normalized();
    if identity.last_name.is_empty() || identity.first_name.is_empty() {
        outcome.failed.push(ImportFailure {
            student: identity,
            reason: "last name and first name are required".to_string(),
        });
        return None;
    }

    match store.find_student(&identity).await {
        Ok(Some(_)) => {
            outcome.duplicates.push(identity);
            return None;
        }
        Ok(None) => {}
        Err(e) => {
            warn!(student = %identity, error = %e, "Student lookup failed");
            outcome.failed.push(ImportFailure {
                student: identity,
                reason: e.to_string(),
            });
            return None;
        }
    }

    match store.create_student(&identity).await {
        Ok(student) => {
            outcome.created.push(student.id);
            Some(student.id)
        }
        Err(StoreError::Conflict(_)) => {
            outcome.duplicates.push(identity);
            None
        }
        Err(e) => {
            warn!(student = %identity, error = %e, "Student creation failed");
            outcome.failed.push(ImportFailure {
                student: identity,
                reason: e.to_string(),
            });
            None
        }
    }
}

async fn place<S>(store: &mut S, student: StudentId, level: GradeLevel) -> Result<(), StoreError>
where
    S: RosterStore + ?Sized,
{
    let roster = store.roster_for(level).await?;
    let current = store.enrollments_of(student).await?;

    if current.iter().any(|r| r.id == roster.id) {
        return Ok(());
    }
    if let Some(other) = current.first() {
        return Err(StoreError::Conflict(format!(
            "student {student} is already enrolled in {}",
            other.grade_level
        )));
    }

    store.add_student_to_roster(roster.id, student).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryRosterStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_enroll_places_students_by_age() {
        let mut store = MemoryRosterStore::new();
        let records = vec![
            StudentIdentity::new("Martin", "Léa", date(2021, 5, 4)),
            StudentIdentity::new("Durand", "Hugo", date(2018, 1, 20)),
        ];

        let outcome = enroll(&mut store, &records, date(2024, 9, 1)).await;

        assert_eq!(outcome.created.len(), 2);
        assert_eq!(outcome.enrolled.len(), 2);
        assert_eq!(outcome.enrolled[0].grade_level, GradeLevel::PetiteSection);
        assert_eq!(outcome.enrolled[1].grade_level, GradeLevel::Cp);
        assert!(store.members(GradeLevel::Cp).contains(&outcome.enrolled[1].student_id));
    }

    #[tokio::test]
    async fn test_enroll_skips_existing_students() {
        let mut store = MemoryRosterStore::new();
        let record = StudentIdentity::new("Martin", "Léa", date(2021, 5, 4));
        enroll(&mut store, std::slice::from_ref(&record), date(2024, 9, 1)).await;

        let again = enroll(&mut store, &[record.clone(), record.clone()], date(2024, 9, 1)).await;

        assert!(again.created.is_empty());
        assert_eq!(again.duplicates, vec![record.clone(), record]);
        assert_eq!(store.members(GradeLevel::PetiteSection).len(), 1);
    }

    #[tokio::test]
    async fn test_enroll_creates_but_does_not_place_too_young() {
        let mut store = MemoryRosterStore::new();
        let records = vec![StudentIdentity::new("Petit", "Noé", date(2023, 2, 1))];

        let outcome = enroll(&mut store, &records, date(2024, 9, 1)).await;

        assert_eq!(outcome.created.len(), 1);
        assert_eq!(outcome.not_eligible, outcome.created);
        assert!(store.list_rosters().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_enroll_reports_failures_and_continues() {
        let mut store = MemoryRosterStore::new();
        let records = vec![
            StudentIdentity::new("", "Anonyme", date(2018, 1, 1)),
            StudentIdentity::new("Roux", "Inès", date(2017, 11, 30)),
        ];

        let outcome = enroll(&mut store, &records, date(2024, 9, 1)).await;

        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.enrolled.len(), 1);
        assert_eq!(outcome.enrolled[0].grade_level, GradeLevel::Cp);
    }

    #[tokio::test]
    async fn test_register_never_enrolls() {
        let mut store = MemoryRosterStore::new();
        let records = vec![StudentIdentity::new("Durand", "Hugo", date(2018, 1, 20))];

        let outcome = register(&mut store, &records).await;

        assert_eq!(outcome.created.len(), 1);
        assert!(outcome.enrolled.is_empty());
        assert!(store.list_rosters().await.unwrap().is_empty());
    }
}
