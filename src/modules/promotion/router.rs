use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{get_runs, run_promotion, upload_promotion, validate_repeating};

pub fn init_promotion_router() -> Router<AppState> {
    Router::new()
        .route("/", post(run_promotion))
        .route("/upload", post(upload_promotion))
        .route("/validate", post(validate_repeating))
        .route("/runs", get(get_runs))
}
