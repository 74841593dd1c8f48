use utoipa::ToSchema;

pub use rentree_models::{
    LineError, PromotionOutcome, PromotionRequest, PromotionResponse, PromotionRun,
    RepeatingValidation, ResolvedRepeating, StudentIdentity, ValidateRepeatingRequest,
};

/// Form accepted by `POST /api/promotion/upload`.
///
/// Only describes the multipart body in the OpenAPI document; the handler
/// reads the parts through `UploadForm`.
#[derive(ToSchema)]
pub struct PromotionUploadForm {
    /// CSV of repeating students: `Nom`, `Prenom`, `Date de naissance`
    #[schema(value_type = String, format = Binary)]
    pub redoublants: Vec<u8>,
    /// Calendar year of the rentrée being entered; defaults to the current year
    pub school_year: Option<i32>,
}
