//! Staff user models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::UserId;

/// Staff account as stored in the database.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a [`User`], without the password hash.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserInfo {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(custom(function = "validate_role"))]
    pub role: String,
}

/// Staff roles. Scopes granted to each role live in `rentree_core::scopes`.
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const SECRETARY: &str = "secretary";

    pub const ALL: &[&str] = &[ADMIN, SECRETARY];

    pub fn is_known(role: &str) -> bool {
        ALL.contains(&role)
    }
}

fn validate_role(role: &str) -> Result<(), validator::ValidationError> {
    if roles::is_known(role) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("unknown_role"))
    }
}
