//! Login request and response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::UserInfo;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    #[schema(example = "direction@ecole.fr")]
    pub email: String,
    #[validate(length(min = 1))]
    #[schema(example = "password123")]
    pub password: String,
}

/// Successful login: a bearer token carrying the scopes of the user's role.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub scopes: Vec<String>,
    pub user: UserInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            email: "direction@ecole.fr".to_string(),
            password: "secret".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = LoginRequest {
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let empty_password = LoginRequest {
            email: "direction@ecole.fr".to_string(),
            password: String::new(),
        };
        assert!(empty_password.validate().is_err());
    }
}
