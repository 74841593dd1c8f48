//! # Rentree DB
//!
//! PostgreSQL pool initialisation and embedded migrations.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
//!
//! # Example
//!
//! ```ignore
//! use rentree_db::{DatabaseConfig, init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;
//! run_migrations(&pool).await?;
//! ```

use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::time::Duration;
use tracing::info;

pub use sqlx::PgPool;

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Reads the database settings from the environment.
    ///
    /// Returns `None` when `DATABASE_URL` is not set.
    pub fn from_env() -> Option<Self> {
        let url = env::var("DATABASE_URL").ok()?;
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        Some(Self {
            url,
            max_connections,
        })
    }
}

/// Opens a PostgreSQL connection pool.
///
/// The pool is cheaply cloneable and should be created once at startup and
/// stored in the application state.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.url)
        .await?;

    info!(
        max_connections = config.max_connections,
        "Database pool initialized"
    );

    Ok(pool)
}

/// Applies the migrations under `migrations/` at the workspace root.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
