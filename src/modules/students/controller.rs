use axum::{
    Json,
    extract::{Multipart, State},
};
use chrono::NaiveDate;
use tracing::instrument;

use rentree_core::AppError;

use super::model::{
    ImportOutcome, ImportStudentsDto, StudentWithGrade, StudentsUploadForm, UploadOutcome,
};
use super::service::StudentService;
use crate::middleware::auth::{RequireStudentsImport, RequireStudentsRead};
use crate::modules::auth::model::ErrorResponse;
use crate::state::AppState;
use crate::upload::UploadForm;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/students",
    responses(
        (status = 200, description = "Every student with their current class", body = Vec<StudentWithGrade>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires students:read", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, _auth))]
pub async fn get_students(
    State(state): State<AppState>,
    RequireStudentsRead(_auth): RequireStudentsRead,
) -> Result<Json<Vec<StudentWithGrade>>, AppError> {
    let students = StudentService::list_students(&state.db).await?;
    Ok(Json(students))
}

/// Import students and place them in classes
///
/// Students that already exist are skipped. `rentree` defaults to the
/// configured start of the current school year.
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = ImportStudentsDto,
    responses(
        (status = 200, description = "Import report", body = ImportOutcome),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires students:import", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, auth_user, dto), fields(user = %auth_user.email(), records = dto.students.len()))]
pub async fn import_students(
    State(state): State<AppState>,
    RequireStudentsImport(auth_user): RequireStudentsImport,
    ValidatedJson(dto): ValidatedJson<ImportStudentsDto>,
) -> Result<Json<ImportOutcome>, AppError> {
    let rentree = dto
        .rentree
        .unwrap_or_else(|| state.school_year.current_rentree());

    let outcome = StudentService::import_students(&state.db, &dto.students, rentree, "json").await?;
    Ok(Json(outcome))
}

/// Import students from a CSV file
#[utoipa::path(
    post,
    path = "/api/students/upload",
    request_body(content = StudentsUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Import report with rejected lines", body = UploadOutcome),
        (status = 400, description = "Missing file or unreadable header", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires students:import", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, auth_user, multipart), fields(user = %auth_user.email()))]
pub async fn upload_students(
    State(state): State<AppState>,
    RequireStudentsImport(auth_user): RequireStudentsImport,
    multipart: Multipart,
) -> Result<Json<UploadOutcome>, AppError> {
    let mut form = UploadForm::read(multipart, "file").await?;
    let content = form.require_file("file")?;
    let rentree = form
        .parse_field::<NaiveDate>("rentree")?
        .unwrap_or_else(|| state.school_year.current_rentree());

    let outcome = StudentService::import_csv(&state.db, &content, rentree).await?;
    Ok(Json(outcome))
}
