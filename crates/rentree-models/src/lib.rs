//! # Rentree Models
//!
//! Domain models and DTOs for the Rentree API.
//!
//! # Modules
//!
//! - [`grade`]: Grade levels and the class assignment rule
//! - [`students`]: Students and their identity triple
//! - [`rosters`]: Class rosters
//! - [`promotion`]: Year-end promotion requests and run history
//! - [`outcomes`]: Import and promotion reports
//! - [`users`], [`auth`]: Staff accounts and login
//! - [`ids`]: Strongly-typed IDs
//!
//! # Example
//!
//! ```ignore
//! use chrono::NaiveDate;
//! use rentree_models::{assign_grade, GradeLevel, Placement};
//!
//! let rentree = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
//! let birth = NaiveDate::from_ymd_opt(2018, 5, 20).unwrap();
//! assert_eq!(assign_grade(birth, rentree), Placement::Grade(GradeLevel::Cp));
//! ```

pub mod auth;
pub mod grade;
pub mod ids;
pub mod outcomes;
pub mod promotion;
pub mod rosters;
pub mod students;
pub mod users;

pub use auth::{LoginRequest, LoginResponse};
pub use grade::{GradeLevel, Placement, age_at, assign_grade, is_preinscrit};
pub use ids::{PromotionRunId, RosterId, StudentId, UserId};
pub use outcomes::{
    EnrolledStudent, ImportFailure, ImportOutcome, LineError, PromotionOutcome, StudentFailure,
    UploadOutcome,
};
pub use promotion::{
    PromotionRequest, PromotionResponse, PromotionRun, RepeatingValidation, ResolvedRepeating,
    ValidateRepeatingRequest,
};
pub use rosters::{ClassRoster, ClassRosterWithStudents};
pub use students::{ImportStudentsDto, RentreeQuery, Student, StudentIdentity, StudentWithGrade};
pub use users::{CreateUserDto, User, UserInfo, roles};
