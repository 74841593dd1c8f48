//! In-memory [`RosterStore`], used by tests and by the CLI dry run.

use std::collections::{BTreeMap, BTreeSet};
#[cfg(test)]
use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use rentree_models::{ClassRoster, GradeLevel, RosterId, Student, StudentId, StudentIdentity};

use crate::store::{Roster, RosterStore, StoreError};

#[derive(Debug)]
struct Entry {
    roster: ClassRoster,
    members: BTreeSet<StudentId>,
}

/// Rosters and students held in ordered maps.
///
/// Membership sets do not enforce the one-roster-per-student rule; the
/// procedures check it themselves, exactly as they do against PostgreSQL.
#[derive(Debug, Default)]
pub struct MemoryRosterStore {
    students: BTreeMap<StudentId, Student>,
    rosters: BTreeMap<GradeLevel, Entry>,
    #[cfg(test)]
    failing_adds: HashSet<StudentId>,
    #[cfg(test)]
    failing_removes: HashSet<StudentId>,
}

impl MemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Members of the roster of `grade`; empty when the roster does not exist.
    pub fn members(&self, grade: GradeLevel) -> BTreeSet<StudentId> {
        self.rosters
            .get(&grade)
            .map(|entry| entry.members.clone())
            .unwrap_or_default()
    }

    /// Levels whose roster contains `student`.
    pub fn grades_of(&self, student: StudentId) -> Vec<GradeLevel> {
        self.rosters
            .iter()
            .filter(|(_, entry)| entry.members.contains(&student))
            .map(|(grade, _)| *grade)
            .collect()
    }

    /// Makes every later add of `student` fail.
    #[cfg(test)]
    pub fn fail_adds_for(&mut self, student: StudentId) {
        self.failing_adds.insert(student);
    }

    /// Makes every later removal of `student` fail.
    #[cfg(test)]
    pub fn fail_removes_for(&mut self, student: StudentId) {
        self.failing_removes.insert(student);
    }

    fn entry_mut(&mut self, roster: RosterId) -> Result<&mut Entry, StoreError> {
        self.rosters
            .values_mut()
            .find(|entry| entry.roster.id == roster)
            .ok_or_else(|| StoreError::NotFound(format!("roster {roster}")))
    }
}

#[async_trait]
impl RosterStore for MemoryRosterStore {
    async fn list_rosters(&mut self) -> Result<Vec<Roster>, StoreError> {
        Ok(self
            .rosters
            .values()
            .map(|entry| Roster {
                id: entry.roster.id,
                grade_level: entry.roster.grade_level,
                students: entry.members.clone(),
            })
            .collect())
    }

    async fn find_roster(&mut self, grade: GradeLevel) -> Result<Option<ClassRoster>, StoreError> {
        Ok(self.rosters.get(&grade).map(|entry| entry.roster.clone()))
    }

    async fn create_roster(&mut self, grade: GradeLevel) -> Result<ClassRoster, StoreError> {
        let entry = self.rosters.entry(grade).or_insert_with(|| Entry {
            roster: ClassRoster {
                id: RosterId::new(),
                grade_level: grade,
                created_at: Utc::now(),
            },
            members: BTreeSet::new(),
        });
        Ok(entry.roster.clone())
    }

    async fn add_student_to_roster(
        &mut self,
        roster: RosterId,
        student: StudentId,
    ) -> Result<(), StoreError> {
        #[cfg(test)]
        if self.failing_adds.contains(&student) {
            return Err(StoreError::Conflict(format!(
                "write rejected for student {student}"
            )));
        }
        if !self.students.contains_key(&student) {
            return Err(StoreError::NotFound(format!("student {student}")));
        }
        self.entry_mut(roster)?.members.insert(student);
        Ok(())
    }

    async fn remove_student_from_roster(
        &mut self,
        roster: RosterId,
        student: StudentId,
    ) -> Result<(), StoreError> {
        #[cfg(test)]
        if self.failing_removes.contains(&student) {
            return Err(StoreError::Conflict(format!(
                "write rejected for student {student}"
            )));
        }
        if self.entry_mut(roster)?.members.remove(&student) {
            Ok(())
        } else {
            Err(StoreError::NotFound(format!(
                "student {student} in roster {roster}"
            )))
        }
    }

    async fn enrollments_of(&mut self, student: StudentId) -> Result<Vec<ClassRoster>, StoreError> {
        Ok(self
            .rosters
            .values()
            .filter(|entry| entry.members.contains(&student))
            .map(|entry| entry.roster.clone())
            .collect())
    }

    async fn find_student(
        &mut self,
        identity: &StudentIdentity,
    ) -> Result<Option<Student>, StoreError> {
        Ok(self
            .students
            .values()
            .find(|student| {
                student.last_name == identity.last_name
                    && student.first_name == identity.first_name
                    && student.birth_date == identity.birth_date
            })
            .cloned())
    }

    async fn create_student(&mut self, identity: &StudentIdentity) -> Result<Student, StoreError> {
        if self.find_student(identity).await?.is_some() {
            return Err(StoreError::Conflict(format!("student {identity} already exists")));
        }
        let student = Student {
            id: StudentId::new(),
            last_name: identity.last_name.clone(),
            first_name: identity.first_name.clone(),
            birth_date: identity.birth_date,
            created_at: Utc::now(),
        };
        self.students.insert(student.id, student.clone());
        Ok(student)
    }

    async fn list_students(&mut self) -> Result<Vec<Student>, StoreError> {
        let mut students: Vec<Student> = self.students.values().cloned().collect();
        students.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.birth_date).cmp(&(&b.last_name, &b.first_name, b.birth_date))
        });
        Ok(students)
    }
}
