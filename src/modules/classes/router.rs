use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_class, get_classes};

pub fn init_classes_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_classes))
        .route("/{grade}", get(get_class))
}
