use utoipa::ToSchema;

pub use rentree_models::{RentreeQuery, Student, UploadOutcome};

/// Form accepted by `POST /api/preinscrits`.
#[derive(ToSchema)]
pub struct PreinscritsUploadForm {
    /// Text file, one child per line: `Nom Prenom 12 mars 2022`
    #[schema(value_type = String, format = Binary)]
    pub preinscrit: Vec<u8>,
}
