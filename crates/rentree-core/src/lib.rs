//! # Rentree Core
//!
//! Core types, errors, and utilities for the Rentree API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Password hashing and verification
//! - [`scopes`]: Capability strings embedded in access tokens
//!
//! # Example
//!
//! ```ignore
//! use rentree_core::errors::AppError;
//! use rentree_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Student not found"));
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod password;
pub mod scopes;

pub use errors::AppError;
pub use password::{hash_password, verify_password};
