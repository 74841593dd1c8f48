use serde::Serialize;
use utoipa::ToSchema;

pub use rentree_auth::Claims;
pub use rentree_models::{LoginRequest, LoginResponse, UserInfo};

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
