mod common;

use common::test_jwt_config;
use rentree_auth::{create_access_token, verify_token};
use rentree_config::JwtConfig;
use rentree_core::scopes;
use rentree_models::roles;
use uuid::Uuid;

#[test]
fn test_create_access_token_for_every_role() {
    let jwt_config = test_jwt_config();

    for role in roles::ALL {
        let token = create_access_token(
            Uuid::new_v4(),
            "test@example.com",
            role,
            scopes::for_role(role),
            &jwt_config,
        );
        assert!(token.is_ok());
        assert!(!token.unwrap().is_empty());
    }
}

#[test]
fn test_verify_token_round_trips_claims() {
    let jwt_config = test_jwt_config();
    let user_id = Uuid::new_v4();

    let token = create_access_token(
        user_id,
        "secretariat@example.com",
        roles::SECRETARY,
        scopes::for_role(roles::SECRETARY),
        &jwt_config,
    )
    .unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.email, "secretariat@example.com");
    assert_eq!(claims.role, roles::SECRETARY);
    assert!(claims.has_scope(scopes::STUDENTS_IMPORT));
    assert!(!claims.has_scope(scopes::ROSTER_PROMOTE));
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn test_verify_token_wrong_secret() {
    let token = create_access_token(
        Uuid::new_v4(),
        "test@example.com",
        roles::ADMIN,
        scopes::for_role(roles::ADMIN),
        &test_jwt_config(),
    )
    .unwrap();

    let other = JwtConfig {
        secret: "another_secret".to_string(),
        access_token_expiry: 3600,
    };
    let err = verify_token(&token, &other).unwrap_err();
    assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
}

#[test]
fn test_verify_token_garbage() {
    assert!(verify_token("not.a.token", &test_jwt_config()).is_err());
    assert!(verify_token("", &test_jwt_config()).is_err());
}
