use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_preinscrits, upload_preinscrits};

pub fn init_preinscrits_router() -> Router<AppState> {
    Router::new().route("/", get(get_preinscrits).post(upload_preinscrits))
}
