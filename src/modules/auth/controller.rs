use axum::Json;
use axum::extract::State;
use tracing::instrument;

use rentree_core::AppError;

use super::model::{Claims, ErrorResponse, LoginRequest, LoginResponse};
use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Login and receive an access token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto), fields(email = %dto.email))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login_user(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Claims of the current access token
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current token claims", body = Claims),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
pub async fn current_user(auth_user: AuthUser) -> Json<Claims> {
    Json(auth_user.0)
}
