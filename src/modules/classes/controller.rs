use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use rentree_core::AppError;

use super::model::{ClassRosterWithStudents, GradeLevel};
use super::service::ClassService;
use crate::middleware::auth::RequireClassesRead;
use crate::modules::auth::model::ErrorResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/classes",
    responses(
        (status = 200, description = "Every class with its students", body = Vec<ClassRosterWithStudents>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires classes:read", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, _auth))]
pub async fn get_classes(
    State(state): State<AppState>,
    RequireClassesRead(_auth): RequireClassesRead,
) -> Result<Json<Vec<ClassRosterWithStudents>>, AppError> {
    let classes = ClassService::list_classes(&state.db).await?;
    Ok(Json(classes))
}

/// One class by grade level
///
/// Accepts the label (`Petite Section`), a slug (`petite-section`) or the
/// abbreviation (`PS`).
#[utoipa::path(
    get,
    path = "/api/classes/{grade}",
    params(
        ("grade" = String, Path, description = "Grade level, e.g. `CP` or `moyenne-section`")
    ),
    responses(
        (status = 200, description = "Class with its students", body = ClassRosterWithStudents),
        (status = 400, description = "Unknown grade level", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires classes:read", body = ErrorResponse),
        (status = 404, description = "No class for this grade yet", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, _auth))]
pub async fn get_class(
    State(state): State<AppState>,
    RequireClassesRead(_auth): RequireClassesRead,
    Path(grade): Path<String>,
) -> Result<Json<ClassRosterWithStudents>, AppError> {
    let grade: GradeLevel = grade.parse().map_err(AppError::bad_request)?;
    let class = ClassService::get_class(&state.db, grade).await?;
    Ok(Json(class))
}
