use axum::{
    Json,
    extract::{Multipart, Query, State},
};
use tracing::instrument;

use rentree_core::AppError;

use super::model::{PreinscritsUploadForm, RentreeQuery, Student, UploadOutcome};
use super::service::PreinscritService;
use crate::middleware::auth::{RequireStudentsImport, RequireStudentsRead};
use crate::modules::auth::model::ErrorResponse;
use crate::state::AppState;
use crate::upload::UploadForm;

/// Children too young for Petite Section at the rentrée
#[utoipa::path(
    get,
    path = "/api/preinscrits",
    params(RentreeQuery),
    responses(
        (status = 200, description = "Pre-registered children", body = Vec<Student>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires students:read", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Preinscrits"
)]
#[instrument(skip(state, _auth))]
pub async fn get_preinscrits(
    State(state): State<AppState>,
    RequireStudentsRead(_auth): RequireStudentsRead,
    Query(query): Query<RentreeQuery>,
) -> Result<Json<Vec<Student>>, AppError> {
    let rentree = query
        .rentree
        .unwrap_or_else(|| state.school_year.current_rentree());

    let students = PreinscritService::list_preinscrits(&state.db, rentree).await?;
    Ok(Json(students))
}

/// Upload a pre-registration file
#[utoipa::path(
    post,
    path = "/api/preinscrits",
    request_body(content = PreinscritsUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Registration report with rejected lines", body = UploadOutcome),
        (status = 400, description = "No file received", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires students:import", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Preinscrits"
)]
#[instrument(skip(state, auth_user, multipart), fields(user = %auth_user.email()))]
pub async fn upload_preinscrits(
    State(state): State<AppState>,
    RequireStudentsImport(auth_user): RequireStudentsImport,
    multipart: Multipart,
) -> Result<Json<UploadOutcome>, AppError> {
    let mut form = UploadForm::read(multipart, "preinscrit").await?;
    let content = form.require_file("preinscrit")?;

    let outcome = PreinscritService::import_file(&state.db, &content).await?;
    Ok(Json(outcome))
}
