//! Year-end promotion: every roster moves up one grade level.
//!
//! The procedure is **not idempotent**. Running it twice advances students
//! twice, so callers must ensure it runs at most once per school year.

use std::collections::{BTreeMap, HashMap, HashSet};

use rentree_models::{
    GradeLevel, PromotionOutcome, RosterId, StudentFailure, StudentId, StudentIdentity,
};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::store::{Roster, RosterStore, StoreError};

#[derive(Debug, Error)]
pub enum PromotionError {
    #[error("student {student_id} is enrolled in both {first} and {second}")]
    DuplicateEnrollment {
        student_id: StudentId,
        first: GradeLevel,
        second: GradeLevel,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Promotes every student of every roster to the next grade level.
///
/// Repeating students stay where they are; non-repeating CM2 students leave
/// every roster. Students are taken from a snapshot made before the first
/// write, so a student moved into a level is never moved a second time.
///
/// Fails without writing anything when the snapshot cannot be read or
/// shows a student in two rosters. After that point individual failures are
/// reported in the outcome and the run continues.
#[instrument(skip(store, repeating), fields(repeating = repeating.len()))]
pub async fn promote<S>(
    store: &mut S,
    repeating: &HashSet<StudentIdentity>,
) -> Result<PromotionOutcome, PromotionError>
where
    S: RosterStore + ?Sized,
{
    let snapshot = store.list_rosters().await?;
    let placement = single_enrollment(&snapshot)?;

    let mut outcome = PromotionOutcome::default();
    let repeating_ids = resolve_repeating(store, repeating, &placement, &mut outcome).await?;

    let mut targets: BTreeMap<GradeLevel, RosterId> =
        snapshot.iter().map(|r| (r.grade_level, r.id)).collect();

    for roster in &snapshot {
        match roster.grade_level.next() {
            Some(next) => {
                promote_roster(store, roster, next, &repeating_ids, &mut targets, &mut outcome)
                    .await
            }
            None => graduate_roster(store, roster, &repeating_ids, &mut outcome).await,
        }
    }

    info!(
        promoted = outcome.promoted.len(),
        retained = outcome.retained.len(),
        graduated = outcome.graduated.len(),
        unknown_repeating = outcome.unknown_repeating.len(),
        failed = outcome.failed.len(),
        indeterminate = outcome.indeterminate.len(),
        "Promotion finished"
    );

    Ok(outcome)
}

/// Maps every enrolled student to its level, rejecting double enrollment.
fn single_enrollment(snapshot: &[Roster]) -> Result<HashMap<StudentId, GradeLevel>, PromotionError> {
    let mut placement = HashMap::new();
    for roster in snapshot {
        for &student_id in &roster.students {
            if let Some(first) = placement.insert(student_id, roster.grade_level) {
                return Err(PromotionError::DuplicateEnrollment {
                    student_id,
                    first,
                    second: roster.grade_level,
                });
            }
        }
    }
    Ok(placement)
}

async fn resolve_repeating<S>(
    store: &mut S,
    repeating: &HashSet<StudentIdentity>,
    placement: &HashMap<StudentId, GradeLevel>,
    outcome: &mut PromotionOutcome,
) -> Result<HashSet<StudentId>, StoreError>
where
    S: RosterStore + ?Sized,
{
    let mut identities: Vec<StudentIdentity> = repeating.iter().map(|i| i.normalized()).collect();
    identities.sort();
    identities.dedup();

    let mut ids = HashSet::new();
    for identity in identities {
        match store.find_student(&identity).await? {
            Some(student) if placement.contains_key(&student.id) => {
                ids.insert(student.id);
            }
            Some(_) => {
                warn!(student = %identity, "Repeating student is not enrolled in any class");
                outcome.unknown_repeating.push(identity);
            }
            None => {
                warn!(student = %identity, "Repeating student not found");
                outcome.unknown_repeating.push(identity);
            }
        }
    }
    Ok(ids)
}

async fn promote_roster<S>(
    store: &mut S,
    roster: &Roster,
    next: GradeLevel,
    repeating: &HashSet<StudentId>,
    targets: &mut BTreeMap<GradeLevel, RosterId>,
    outcome: &mut PromotionOutcome,
) where
    S: RosterStore + ?Sized,
{
    let movers: Vec<StudentId> = roster
        .students
        .iter()
        .copied()
        .filter(|id| {
            if repeating.contains(id) {
                outcome.retained.push(*id);
                false
            } else {
                true
            }
        })
        .collect();

    if movers.is_empty() {
        return;
    }

    let target = match targets.get(&next) {
        Some(id) => *id,
        None => match store.create_roster(next).await {
            Ok(created) => {
                targets.insert(next, created.id);
                created.id
            }
            Err(e) => {
                error!(grade_level = %next, error = %e, "Could not create roster");
                outcome.failed.extend(movers.into_iter().map(|student_id| StudentFailure {
                    student_id,
                    grade_level: roster.grade_level,
                    reason: format!("could not create roster {next}: {e}"),
                    found_in: vec![roster.grade_level],
                }));
                return;
            }
        },
    };

    for student_id in movers {
        let write = store.move_student(student_id, roster.id, target).await;
        match settle(store, student_id, roster, Some(target), write).await {
            Settled::Done => outcome.promoted.push(student_id),
            Settled::Failed(failure) => outcome.failed.push(failure),
            Settled::Indeterminate(failure) => outcome.indeterminate.push(failure),
        }
    }
}

async fn graduate_roster<S>(
    store: &mut S,
    roster: &Roster,
    repeating: &HashSet<StudentId>,
    outcome: &mut PromotionOutcome,
) where
    S: RosterStore + ?Sized,
{
    for &student_id in &roster.students {
        if repeating.contains(&student_id) {
            outcome.retained.push(student_id);
            continue;
        }

        let write = store.remove_student_from_roster(roster.id, student_id).await;
        match settle(store, student_id, roster, None, write).await {
            Settled::Done => outcome.graduated.push(student_id),
            Settled::Failed(failure) => outcome.failed.push(failure),
            Settled::Indeterminate(failure) => outcome.indeterminate.push(failure),
        }
    }
}

enum Settled {
    Done,
    Failed(StudentFailure),
    Indeterminate(StudentFailure),
}

/// Re-reads the enrollments of a student after a write and classifies the
/// result. `expected` is the roster the student must end up in, `None` for
/// no roster at all.
async fn settle<S>(
    store: &mut S,
    student_id: StudentId,
    origin: &Roster,
    expected: Option<RosterId>,
    write: Result<(), StoreError>,
) -> Settled
where
    S: RosterStore + ?Sized,
{
    let failure = |reason: String, found_in: Vec<GradeLevel>| StudentFailure {
        student_id,
        grade_level: origin.grade_level,
        reason,
        found_in,
    };

    let found = match store.enrollments_of(student_id).await {
        Ok(found) => found,
        Err(check) => {
            let reason = match write {
                Ok(()) => format!("could not verify enrollment: {check}"),
                Err(e) => format!("{e}; could not verify enrollment: {check}"),
            };
            error!(%student_id, %reason, "Student left in an unknown state");
            return Settled::Indeterminate(failure(reason, Vec::new()));
        }
    };

    let found_ids: Vec<RosterId> = found.iter().map(|r| r.id).collect();
    let found_in: Vec<GradeLevel> = found.iter().map(|r| r.grade_level).collect();

    match write {
        Ok(()) if found_ids == expected.into_iter().collect::<Vec<_>>() => Settled::Done,
        Ok(()) => {
            let reason = "enrollment after the write does not match the expected roster".to_string();
            error!(%student_id, ?found_in, "Student left in an unexpected roster");
            Settled::Indeterminate(failure(reason, found_in))
        }
        Err(e) if found_ids == [origin.id] => {
            warn!(%student_id, error = %e, "Student not moved");
            Settled::Failed(failure(e.to_string(), found_in))
        }
        Err(e) => {
            error!(%student_id, error = %e, ?found_in, "Student partially moved");
            Settled::Indeterminate(failure(e.to_string(), found_in))
        }
    }
}
