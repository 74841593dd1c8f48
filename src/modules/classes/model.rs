pub use rentree_models::{ClassRoster, ClassRosterWithStudents, GradeLevel, Student};
