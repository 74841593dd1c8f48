use anyhow::Context;
use dotenvy::dotenv;
use rentree::logging::init_tracing;
use rentree::metrics::{init_metrics, metrics_app};
use rentree::router::init_router;
use rentree::state::AppState;
use rentree_db::{DatabaseConfig, init_db_pool, run_migrations};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_tracing().context("Failed to set up logging")?;
    let prometheus = init_metrics().context("Failed to install metrics recorder")?;

    let db_config = DatabaseConfig::from_env().context("DATABASE_URL must be set")?;
    let pool = init_db_pool(&db_config).await?;
    run_migrations(&pool).await?;

    let state = AppState::from_env(pool);
    if state.jwt_config.uses_dev_secret() {
        warn!("JWT_SECRET is not set; tokens are signed with the development secret");
    }
    let mut app = init_router(state);
    if let Some(handle) = prometheus {
        app = app.merge(metrics_app(handle));
    }

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!("Server running on http://localhost:{port}");
    info!("Swagger UI available at http://localhost:{port}/swagger-ui");
    info!("Scalar UI available at http://localhost:{port}/scalar");
    axum::serve(listener, app).await?;

    Ok(())
}
