use sqlx::PgPool;

use rentree_config::{CorsConfig, JwtConfig, SchoolYearConfig};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub school_year: SchoolYearConfig,
}

impl AppState {
    /// Builds the state around an open pool, reading every other setting from
    /// the environment.
    pub fn from_env(db: PgPool) -> Self {
        Self {
            db,
            jwt_config: JwtConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            school_year: SchoolYearConfig::from_env(),
        }
    }
}
