//! Persistence seam for rosters and students.

use std::collections::BTreeSet;

use async_trait::async_trait;
use rentree_models::{ClassRoster, GradeLevel, RosterId, Student, StudentId, StudentIdentity};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0} not found")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
}

/// A roster together with the ids of its students.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    pub id: RosterId,
    pub grade_level: GradeLevel,
    pub students: BTreeSet<StudentId>,
}

/// Storage used by [`enroll`](crate::enroll) and [`promote`](crate::promote).
///
/// Methods take `&mut self` so an implementation can hold a single database
/// connection for the whole operation.
#[async_trait]
pub trait RosterStore: Send {
    /// Every roster with its members, ordered by grade level.
    async fn list_rosters(&mut self) -> Result<Vec<Roster>, StoreError>;

    async fn find_roster(&mut self, grade: GradeLevel) -> Result<Option<ClassRoster>, StoreError>;

    /// Creates the roster of `grade`, or returns it when it already exists.
    async fn create_roster(&mut self, grade: GradeLevel) -> Result<ClassRoster, StoreError>;

    async fn add_student_to_roster(
        &mut self,
        roster: RosterId,
        student: StudentId,
    ) -> Result<(), StoreError>;

    /// Fails with [`StoreError::NotFound`] when the student is not a member.
    async fn remove_student_from_roster(
        &mut self,
        roster: RosterId,
        student: StudentId,
    ) -> Result<(), StoreError>;

    /// Moves a student between rosters.
    ///
    /// The default adds to `to` before removing from `from`, so a failure
    /// between the two steps leaves the student in both rosters. Stores that
    /// can move atomically should override it.
    async fn move_student(
        &mut self,
        student: StudentId,
        from: RosterId,
        to: RosterId,
    ) -> Result<(), StoreError> {
        self.add_student_to_roster(to, student).await?;
        self.remove_student_from_roster(from, student).await
    }

    /// Rosters the student currently belongs to.
    async fn enrollments_of(&mut self, student: StudentId) -> Result<Vec<ClassRoster>, StoreError>;

    async fn find_student(
        &mut self,
        identity: &StudentIdentity,
    ) -> Result<Option<Student>, StoreError>;

    /// Fails with [`StoreError::Conflict`] when the identity already exists.
    async fn create_student(&mut self, identity: &StudentIdentity) -> Result<Student, StoreError>;

    async fn list_students(&mut self) -> Result<Vec<Student>, StoreError>;

    /// Roster of `grade`, created on first use.
    async fn roster_for(&mut self, grade: GradeLevel) -> Result<ClassRoster, StoreError> {
        match self.find_roster(grade).await? {
            Some(roster) => Ok(roster),
            None => self.create_roster(grade).await,
        }
    }
}
