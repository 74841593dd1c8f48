//! JWT creation and verification for access tokens.
//!
//! Tokens are HS256-signed with [`JwtConfig::secret`] and expire after
//! [`JwtConfig::access_token_expiry`] seconds.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use rentree_config::JwtConfig;
use rentree_core::AppError;

use crate::claims::Claims;

/// Creates an access token embedding the user's role and scopes.
///
/// # Errors
///
/// Returns an internal error if token encoding fails.
pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    role: &str,
    scopes: Vec<String>,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        scopes,
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create token: {}", e)))
}

/// Verifies an access token and returns its claims.
///
/// # Errors
///
/// Returns an unauthorized error if the signature is invalid, the token has
/// expired, or it is malformed.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}
