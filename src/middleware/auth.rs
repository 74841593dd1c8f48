use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use rentree_auth::{Claims, verify_token};
use rentree_core::AppError;
use rentree_models::UserId;

use crate::state::AppState;

/// Extractor that validates the bearer token and provides its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.0.has_scope(scope)
    }

    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn role(&self) -> &str {
        &self.0.role
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Defines an extractor that only succeeds when the token carries `$scope`.
#[macro_export]
macro_rules! require_scope {
    ($name:ident, $scope:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = rentree_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;

                if !auth_user.has_scope($scope) {
                    return Err(rentree_core::AppError::forbidden(format!(
                        "Access denied. Missing required scope: {}",
                        $scope
                    )));
                }

                Ok($name(auth_user))
            }
        }
    };
}

require_scope!(RequireStudentsRead, rentree_core::scopes::STUDENTS_READ);
require_scope!(RequireStudentsImport, rentree_core::scopes::STUDENTS_IMPORT);
require_scope!(RequireClassesRead, rentree_core::scopes::CLASSES_READ);
require_scope!(RequireRosterPromote, rentree_core::scopes::ROSTER_PROMOTE);

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn claims(sub: String, scopes: &[&str]) -> Claims {
        Claims {
            sub,
            email: "direction@ecole.fr".to_string(),
            role: "admin".to_string(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_has_scope() {
        let auth_user = AuthUser(claims(Uuid::new_v4().to_string(), &["classes:read"]));
        assert!(auth_user.has_scope("classes:read"));
        assert!(!auth_user.has_scope("roster:promote"));
    }

    #[test]
    fn test_user_id() {
        let id = Uuid::new_v4();
        let auth_user = AuthUser(claims(id.to_string(), &[]));
        assert_eq!(auth_user.user_id().unwrap(), UserId::from_uuid(id));

        let broken = AuthUser(claims("not-a-uuid".to_string(), &[]));
        assert!(broken.user_id().is_err());
    }
}
