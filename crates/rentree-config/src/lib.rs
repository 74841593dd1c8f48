//! # Rentree Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: access token signing configuration
//! - [`cors`]: allowed browser origins
//! - [`school_year`]: start-of-school-year (rentrée) date
//!
//! # Example
//!
//! ```ignore
//! use rentree_config::{CorsConfig, JwtConfig, SchoolYearConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let school_year = SchoolYearConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod school_year;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use school_year::SchoolYearConfig;
