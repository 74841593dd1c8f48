//! Promotion dry run.
//!
//! Copies the current rosters into a [`MemoryRosterStore`] and runs the
//! promotion there, so staff can read the report before touching the
//! database.

use std::collections::{HashMap, HashSet};

use rentree_models::{PromotionOutcome, StudentId, StudentIdentity};
use rentree_roster::{MemoryRosterStore, PromotionError, RosterStore, StoreError, promote};

/// In-memory copy of `source`, with new ids mapped back to the originals.
pub struct Snapshot {
    pub store: MemoryRosterStore,
    pub identities: HashMap<StudentId, StudentIdentity>,
}

impl Snapshot {
    pub async fn load<S>(source: &mut S) -> Result<Self, StoreError>
    where
        S: RosterStore + ?Sized,
    {
        let mut store = MemoryRosterStore::new();
        let mut copied = HashMap::new();
        let mut identities = HashMap::new();

        for student in source.list_students().await? {
            let identity = student.identity();
            let copy = store.create_student(&identity).await?;
            copied.insert(student.id, copy.id);
            identities.insert(copy.id, identity);
        }

        for roster in source.list_rosters().await? {
            let target = store.roster_for(roster.grade_level).await?;
            for student in &roster.students {
                let id = copied
                    .get(student)
                    .ok_or_else(|| StoreError::NotFound(format!("student {student}")))?;
                store.add_student_to_roster(target.id, *id).await?;
            }
        }

        Ok(Self { store, identities })
    }

    /// Runs the promotion on the copy.
    pub async fn promote(
        &mut self,
        repeating: &HashSet<StudentIdentity>,
    ) -> Result<PromotionOutcome, PromotionError> {
        promote(&mut self.store, repeating).await
    }

    pub fn describe(&self, id: StudentId) -> String {
        self.identities
            .get(&id)
            .map(ToString::to_string)
            .unwrap_or_else(|| id.to_string())
    }
}

/// Prints the report of a dry run.
pub fn print_report(snapshot: &Snapshot, outcome: &PromotionOutcome) {
    println!("📋 Promotion preview");
    println!("   Promoted:  {}", outcome.promoted.len());
    println!("   Retained:  {}", outcome.retained.len());
    println!("   Graduated: {}", outcome.graduated.len());

    for id in &outcome.retained {
        println!("   ↺ {}", snapshot.describe(*id));
    }
    for id in &outcome.graduated {
        println!("   🎓 {}", snapshot.describe(*id));
    }
    for identity in &outcome.unknown_repeating {
        println!("   ⚠️  Unknown repeating student: {}", identity);
    }
    for failure in outcome.failed.iter().chain(&outcome.indeterminate) {
        println!(
            "   ❌ {} ({}): {}",
            snapshot.describe(failure.student_id),
            failure.grade_level,
            failure.reason
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rentree_models::GradeLevel;
    use rentree_roster::enroll;

    fn identity(last: &str, first: &str, y: i32) -> StudentIdentity {
        StudentIdentity::new(last, first, NaiveDate::from_ymd_opt(y, 3, 10).unwrap())
    }

    #[tokio::test]
    async fn test_preview_leaves_source_untouched() {
        let rentree = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        let mut source = MemoryRosterStore::new();
        let ana = identity("Martin", "Ana", 2018);
        let leo = identity("Roux", "Léo", 2014);
        enroll(&mut source, &[ana.clone(), leo.clone()], rentree).await;

        let mut snapshot = Snapshot::load(&mut source).await.unwrap();
        let outcome = snapshot.promote(&HashSet::new()).await.unwrap();

        assert_eq!(outcome.promoted.len(), 1);
        assert_eq!(outcome.graduated.len(), 1);
        assert_eq!(snapshot.describe(outcome.graduated[0]), leo.to_string());
        assert_eq!(snapshot.store.members(GradeLevel::Ce1).len(), 1);

        assert_eq!(source.members(GradeLevel::Cp).len(), 1);
        assert_eq!(source.members(GradeLevel::Cm2).len(), 1);
    }
}
