//! Feature modules. Each one has a `controller` (HTTP handlers), a `service`
//! (queries and calls into `rentree_roster`), a `model` and a `router`.

pub mod auth;
pub mod classes;
pub mod preinscrits;
pub mod promotion;
pub mod students;

use rentree_core::AppError;
use rentree_roster::StoreError;

/// Maps a storage error onto the matching HTTP status.
pub(crate) fn store_error(err: StoreError) -> AppError {
    match err {
        StoreError::NotFound(_) => AppError::not_found(err),
        StoreError::Conflict(_) => AppError::conflict(err),
        StoreError::Database(_) => AppError::database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_store_error_status() {
        assert_eq!(
            store_error(StoreError::NotFound("roster".into())).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            store_error(StoreError::Conflict("student".into())).status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            store_error(StoreError::Database(sqlx::Error::PoolTimedOut)).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
