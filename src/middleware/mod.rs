//! Request extractors for authentication and scope checks.
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`auth::AuthUser`] verifies the JWT and exposes its claims
//! 3. Scope extractors such as [`auth::RequireRosterPromote`] reject the
//!    request with 403 when the token lacks the scope
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::RequireClassesRead;
//!
//! async fn list_classes(RequireClassesRead(auth_user): RequireClassesRead) {
//!     // Only executes if the token carries "classes:read"
//! }
//! ```

pub mod auth;
