//! # Rentree Auth
//!
//! Access token claims and JWT utilities.
//!
//! - [`claims`]: the [`Claims`] embedded in every access token
//! - [`jwt`]: token creation and verification
//!
//! Tokens carry the staff member's role and the scopes granted to it. The
//! scopes are computed on the server at login and signed; handlers check them
//! on every call instead of trusting anything the browser stores.
//!
//! # Example
//!
//! ```ignore
//! use rentree_auth::{create_access_token, verify_token};
//! use rentree_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "admin@ecole.fr", "admin", scopes, &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
