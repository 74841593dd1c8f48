mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_test_user, generate_unique_email, get_request, json_request, offline_app,
    send, setup_test_app, token_for_role,
};
use rentree_core::scopes;
use rentree_models::roles;
use serde_json::json;
use sqlx::PgPool;

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    for uri in ["/api/students", "/api/classes", "/api/preinscrits", "/api/promotion/runs"] {
        let response = send(offline_app(), get_request(uri, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn test_malformed_token_is_unauthorized() {
    let response = send(offline_app(), get_request("/api/classes", Some("garbage"))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_secretary_cannot_promote() {
    let token = token_for_role(roles::SECRETARY);
    let request = json_request(
        "POST",
        "/api/promotion",
        Some(&token),
        json!({ "school_year": 2025, "repeating": [] }),
    );

    let response = send(offline_app(), request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_role_has_no_scope() {
    let token = token_for_role("janitor");
    let response = send(offline_app(), get_request("/api/students", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_me_returns_claims() {
    let token = token_for_role(roles::ADMIN);
    let response = send(offline_app(), get_request("/api/auth/me", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["role"], roles::ADMIN);
    assert!(
        body["scopes"]
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s == scopes::ROSTER_PROMOTE)
    );
}

#[tokio::test]
async fn test_login_validation_error() {
    let request = json_request(
        "POST",
        "/api/auth/login",
        None,
        json!({ "email": "not-an-email", "password": "" }),
    );
    let response = send(offline_app(), request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_success(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "testpass123", roles::SECRETARY).await;

    let request = json_request(
        "POST",
        "/api/auth/login",
        None,
        json!({ "email": email, "password": "testpass123" }),
    );
    let response = send(setup_test_app(pool), request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["access_token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["role"], roles::SECRETARY);
    assert!(body["user"].get("password").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "testpass123", roles::ADMIN).await;

    let request = json_request(
        "POST",
        "/api/auth/login",
        None,
        json!({ "email": email, "password": "wrongpass" }),
    );
    let response = send(setup_test_app(pool), request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_unknown_user(pool: PgPool) {
    let request = json_request(
        "POST",
        "/api/auth/login",
        None,
        json!({ "email": generate_unique_email(), "password": "testpass123" }),
    );
    let response = send(setup_test_app(pool), request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
