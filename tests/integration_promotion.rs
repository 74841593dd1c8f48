mod common;

use axum::http::StatusCode;
use common::{body_json, get_request, json_request, login_as, multipart_request, send, setup_test_app};
use rentree_models::roles;
use serde_json::json;
use sqlx::PgPool;

/// CP: Durand Alice, Morel Bruno. CM2: Petit Chloé.
async fn seed_school(pool: &PgPool, token: &str) {
    let response = send(
        setup_test_app(pool.clone()),
        json_request(
            "POST",
            "/api/students",
            Some(token),
            json!({
                "rentree": "2024-09-01",
                "students": [
                    { "last_name": "Durand", "first_name": "Alice", "birth_date": "2018-03-01" },
                    { "last_name": "Morel", "first_name": "Bruno", "birth_date": "2018-06-12" },
                    { "last_name": "Petit", "first_name": "Chloé", "birth_date": "2014-02-01" }
                ]
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn class_names(pool: &PgPool, token: &str, grade: &str) -> Vec<String> {
    let response = send(
        setup_test_app(pool.clone()),
        get_request(&format!("/api/classes/{grade}"), Some(token)),
    )
    .await;
    if response.status() == StatusCode::NOT_FOUND {
        return Vec::new();
    }
    body_json(response).await["students"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["first_name"].as_str().unwrap().to_string())
        .collect()
}

fn promotion_body(school_year: i32) -> serde_json::Value {
    json!({
        "school_year": school_year,
        "repeating": [
            { "last_name": "Durand", "first_name": "Alice", "birth_date": "2018-03-01" },
            { "last_name": "Nobody", "first_name": "Zoé", "birth_date": "2017-01-01" }
        ]
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_promotion_moves_every_class(pool: PgPool) {
    let token = login_as(&pool, roles::ADMIN).await;
    seed_school(&pool, &token).await;

    let response = send(
        setup_test_app(pool.clone()),
        json_request("POST", "/api/promotion", Some(&token), promotion_body(2025)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let outcome = &body["outcome"];
    assert_eq!(outcome["promoted"].as_array().unwrap().len(), 1);
    assert_eq!(outcome["retained"].as_array().unwrap().len(), 1);
    assert_eq!(outcome["graduated"].as_array().unwrap().len(), 1);
    assert_eq!(outcome["unknown_repeating"][0]["last_name"], "Nobody");
    assert!(outcome["failed"].as_array().unwrap().is_empty());
    assert!(outcome["indeterminate"].as_array().unwrap().is_empty());

    let run = &body["run"];
    assert_eq!(run["school_year"], 2025);
    assert_eq!(run["promoted_count"], 1);
    assert_eq!(run["unknown_count"], 1);
    assert!(run["completed_at"].is_string());

    assert_eq!(class_names(&pool, &token, "CP").await, vec!["Alice"]);
    assert_eq!(class_names(&pool, &token, "CE1").await, vec!["Bruno"]);
    assert!(class_names(&pool, &token, "CM2").await.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_second_run_for_same_year_is_rejected(pool: PgPool) {
    let token = login_as(&pool, roles::ADMIN).await;
    seed_school(&pool, &token).await;

    let first = send(
        setup_test_app(pool.clone()),
        json_request("POST", "/api/promotion", Some(&token), promotion_body(2025)),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = send(
        setup_test_app(pool.clone()),
        json_request("POST", "/api/promotion", Some(&token), promotion_body(2025)),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    // nobody moved a second time
    assert_eq!(class_names(&pool, &token, "CE1").await, vec!["Bruno"]);
    assert!(class_names(&pool, &token, "CE2").await.is_empty());

    let response = send(
        setup_test_app(pool.clone()),
        get_request("/api/promotion/runs", Some(&token)),
    )
    .await;
    let runs = body_json(response).await;
    assert_eq!(runs.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_validate_repeating_does_not_write(pool: PgPool) {
    let token = login_as(&pool, roles::ADMIN).await;
    seed_school(&pool, &token).await;

    let request = json_request(
        "POST",
        "/api/promotion/validate",
        Some(&token),
        json!({ "repeating": promotion_body(2025)["repeating"] }),
    );
    let response = send(setup_test_app(pool.clone()), request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["matched"][0]["grade_level"], "CP");
    assert_eq!(body["unknown"][0]["first_name"], "Zoé");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_promotion_from_csv_upload(pool: PgPool) {
    let token = login_as(&pool, roles::ADMIN).await;
    seed_school(&pool, &token).await;
    let csv = "Nom,Prenom,Date de naissance\nDurand,Alice,01/03/2018\nMorel,Bruno,pas une date\n";

    let response = send(
        setup_test_app(pool.clone()),
        multipart_request(
            "/api/promotion/upload",
            &token,
            "redoublants",
            csv,
            &[("school_year", "2026")],
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["run"]["school_year"], 2026);
    assert_eq!(body["outcome"]["retained"].as_array().unwrap().len(), 1);
    assert_eq!(body["rejected"][0]["line"], 3);
    assert_eq!(class_names(&pool, &token, "CE1").await, vec!["Bruno"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_promotion_rejects_bad_year(pool: PgPool) {
    let token = login_as(&pool, roles::ADMIN).await;

    let response = send(
        setup_test_app(pool),
        json_request(
            "POST",
            "/api/promotion",
            Some(&token),
            json!({ "school_year": 1815 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upload_rejects_bad_year_without_opening_a_run(pool: PgPool) {
    let token = login_as(&pool, roles::ADMIN).await;
    seed_school(&pool, &token).await;
    let csv = "Nom,Prenom,Date de naissance\nDurand,Alice,01/03/2018\n";

    for year in ["20255", "-1"] {
        let response = send(
            setup_test_app(pool.clone()),
            multipart_request(
                "/api/promotion/upload",
                &token,
                "redoublants",
                csv,
                &[("school_year", year)],
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "year {year}");
    }

    let runs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM promotion_runs")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(runs, 0);
    assert_eq!(class_names(&pool, &token, "CE1").await, Vec::<String>::new());
}
