//! Access token signing.
//!
//! # Environment Variables
//!
//! - `JWT_SECRET`: HMAC secret; a development value is used when unset
//! - `JWT_ACCESS_EXPIRY`: token lifetime in seconds (default: 3600)

use std::env;

const DEV_SECRET: &str = "rentree-dev-secret-change-me";
const DEFAULT_ACCESS_EXPIRY: i64 = 3600;
const MIN_ACCESS_EXPIRY: i64 = 60;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Seconds
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEV_SECRET.to_string());
        let expiry = env::var("JWT_ACCESS_EXPIRY")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_ACCESS_EXPIRY);

        Self::new(secret, expiry)
    }

    /// Lifetimes under a minute are raised to one minute.
    pub fn new(secret: impl Into<String>, access_token_expiry: i64) -> Self {
        Self {
            secret: secret.into(),
            access_token_expiry: access_token_expiry.max(MIN_ACCESS_EXPIRY),
        }
    }

    /// True when no secret was configured.
    pub fn uses_dev_secret(&self) -> bool {
        self.secret == DEV_SECRET
    }
}
