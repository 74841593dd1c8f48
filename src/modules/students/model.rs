use chrono::NaiveDate;
use utoipa::ToSchema;

pub use rentree_models::{
    ImportOutcome, ImportStudentsDto, RentreeQuery, Student, StudentIdentity, StudentWithGrade,
    UploadOutcome,
};

/// Form accepted by `POST /api/students/upload`.
#[derive(ToSchema)]
pub struct StudentsUploadForm {
    /// CSV with the columns `Nom`, `Prenom`, `Date de naissance`
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Start of the school year, `YYYY-MM-DD`
    pub rentree: Option<NaiveDate>,
}
