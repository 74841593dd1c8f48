use crate::docs::ApiDoc;
use crate::logging::{REQUEST_ID_HEADER, logging_middleware};
use crate::metrics::metrics_middleware;
use crate::modules::auth::router::init_auth_router;
use crate::modules::classes::router::init_classes_router;
use crate::modules::preinscrits::router::init_preinscrits_router;
use crate::modules::promotion::router::init_promotion_router;
use crate::modules::students::router::init_students_router;
use crate::state::AppState;
use crate::upload::MAX_UPLOAD_BYTES;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use rentree_config::CorsConfig;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

/// Room left for multipart boundaries and the small text fields.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn init_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_config);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/api", api_router())
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", init_auth_router())
        .nest("/students", init_students_router())
        .nest("/classes", init_classes_router())
        .nest("/preinscrits", init_preinscrits_router())
        .nest("/promotion", init_promotion_router())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([REQUEST_ID_HEADER.clone()])
        .allow_credentials(true)
}
