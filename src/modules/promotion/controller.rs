use axum::{
    Json,
    extract::{Multipart, State},
};
use chrono::{Datelike, Utc};
use tracing::instrument;

use rentree_core::AppError;
use rentree_roster::parse_csv;

use super::model::{
    PromotionRequest, PromotionResponse, PromotionRun, PromotionUploadForm, RepeatingValidation,
    ValidateRepeatingRequest,
};
use super::service::PromotionService;
use crate::middleware::auth::RequireRosterPromote;
use crate::modules::auth::model::ErrorResponse;
use crate::state::AppState;
use crate::upload::UploadForm;
use crate::validator::{ValidatedJson, validate_payload};

/// Promote every class to the next grade level
///
/// Can run once per school year. Repeating students stay in their class;
/// CM2 students who do not repeat leave the school.
#[utoipa::path(
    post,
    path = "/api/promotion",
    request_body = PromotionRequest,
    responses(
        (status = 200, description = "Promotion report", body = PromotionResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires roster:promote", body = ErrorResponse),
        (status = 409, description = "Already run for this school year, or a student is in two classes", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Promotion"
)]
#[instrument(skip(state, auth_user, dto), fields(user = %auth_user.email(), school_year = dto.school_year))]
pub async fn run_promotion(
    State(state): State<AppState>,
    RequireRosterPromote(auth_user): RequireRosterPromote,
    ValidatedJson(dto): ValidatedJson<PromotionRequest>,
) -> Result<Json<PromotionResponse>, AppError> {
    let user_id = auth_user.user_id()?;
    let response =
        PromotionService::run(&state.db, user_id, dto.school_year, dto.repeating, Vec::new())
            .await?;
    Ok(Json(response))
}

/// Promote every class, reading repeating students from a CSV file
#[utoipa::path(
    post,
    path = "/api/promotion/upload",
    request_body(content = PromotionUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Promotion report with rejected lines", body = PromotionResponse),
        (status = 400, description = "Missing file or unreadable header", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires roster:promote", body = ErrorResponse),
        (status = 409, description = "Already run for this school year, or a student is in two classes", body = ErrorResponse),
        (status = 422, description = "School year out of range", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Promotion"
)]
#[instrument(skip(state, auth_user, multipart), fields(user = %auth_user.email()))]
pub async fn upload_promotion(
    State(state): State<AppState>,
    RequireRosterPromote(auth_user): RequireRosterPromote,
    multipart: Multipart,
) -> Result<Json<PromotionResponse>, AppError> {
    let user_id = auth_user.user_id()?;
    let mut form = UploadForm::read(multipart, "redoublants").await?;
    let content = form.require_file("redoublants")?;
    let school_year = form
        .parse_field::<i32>("school_year")?
        .unwrap_or_else(|| Utc::now().year());

    let parsed = parse_csv(&content).map_err(AppError::bad_request)?;
    let request = PromotionRequest {
        school_year,
        repeating: parsed.records,
    };
    validate_payload(&request)?;

    let response = PromotionService::run(
        &state.db,
        user_id,
        request.school_year,
        request.repeating,
        parsed.rejected,
    )
    .await?;
    Ok(Json(response))
}

/// Check a repeating list against the stored students
#[utoipa::path(
    post,
    path = "/api/promotion/validate",
    request_body = ValidateRepeatingRequest,
    responses(
        (status = 200, description = "Matched and unknown identities", body = RepeatingValidation),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires roster:promote", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Promotion"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn validate_repeating(
    State(state): State<AppState>,
    RequireRosterPromote(_auth): RequireRosterPromote,
    ValidatedJson(dto): ValidatedJson<ValidateRepeatingRequest>,
) -> Result<Json<RepeatingValidation>, AppError> {
    let validation = PromotionService::validate_repeating(&state.db, &dto.repeating).await?;
    Ok(Json(validation))
}

#[utoipa::path(
    get,
    path = "/api/promotion/runs",
    responses(
        (status = 200, description = "Past promotion runs, latest first", body = Vec<PromotionRun>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires roster:promote", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Promotion"
)]
#[instrument(skip(state, _auth))]
pub async fn get_runs(
    State(state): State<AppState>,
    RequireRosterPromote(_auth): RequireRosterPromote,
) -> Result<Json<Vec<PromotionRun>>, AppError> {
    let runs = PromotionService::list_runs(&state.db).await?;
    Ok(Json(runs))
}
