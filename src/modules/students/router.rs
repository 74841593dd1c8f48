use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{get_students, import_students, upload_students};

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_students).post(import_students))
        .route("/upload", post(upload_students))
}
