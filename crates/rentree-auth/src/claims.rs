//! JWT claim structure for access tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT claims for access tokens.
///
/// - `sub`: User ID (subject)
/// - `email`: User's email address
/// - `role`: Server-side role the scopes were derived from
/// - `scopes`: Capabilities granted for the lifetime of the token
/// - `exp` / `iat`: Expiry and issued-at Unix timestamps
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    /// User's email address
    pub email: String,
    /// Staff role (`admin` or `secretary`)
    pub role: String,
    /// Granted scopes, e.g. `roster:promote`
    pub scopes: Vec<String>,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}
