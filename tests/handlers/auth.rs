//! Integration tests for register and login.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

#[path = "../common/mod.rs"]
mod common;
use common::*;

use license_server::error::msg;

#[tokio::test]
async fn test_register_returns_user_id() {
    let state = create_test_app_state();

    let response = app(state.clone())
        .oneshot(post_json(
            "/api/auth/register",
            &json!({"email": "new@example.com", "password": "s3cret"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);

    let user_id = body["userId"].as_str().expect("userId should be a string");
    let conn = state.db.get().unwrap();
    let user = queries::get_user_by_id(&conn, user_id).unwrap().unwrap();
    assert_eq!(user.email, "new@example.com");
    assert_ne!(user.password_hash, "s3cret");
}

#[tokio::test]
async fn test_register_duplicate_email_is_generic_400() {
    let state = create_test_app_state();
    let creds = json!({"email": "dup@example.com", "password": "pw"});

    let first = app(state.clone())
        .oneshot(post_json("/api/auth/register", &creds))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app(state.clone())
        .oneshot(post_json(
            "/api/auth/register",
            &json!({"email": "DUP@example.com", "password": "pw"}),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);

    let body = body_json(second).await;
    assert_eq!(body["details"], msg::REGISTRATION_FAILED);
    assert!(!body.to_string().contains("UNIQUE"));

    let conn = state.db.get().unwrap();
    assert_eq!(count_rows(&conn, "users"), 1);
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let state = create_test_app_state();

    for (payload, expected) in [
        (json!({"email": "", "password": "pw"}), msg::EMAIL_EMPTY),
        (json!({"email": "not-an-email", "password": "pw"}), msg::INVALID_EMAIL_FORMAT),
        (json!({"email": "ok@example.com", "password": ""}), msg::PASSWORD_EMPTY),
    ] {
        let response = app(state.clone())
            .oneshot(post_json("/api/auth/register", &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(body_json(response).await["details"], expected);
    }

    let response = app(state.clone())
        .oneshot(post_json("/api/auth/register", &json!({"email": "x@example.com"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let conn = state.db.get().unwrap();
    assert_eq!(count_rows(&conn, "users"), 0);
}

#[tokio::test]
async fn test_login_token_identifies_user() {
    let state = create_test_app_state();
    let user = {
        let conn = state.db.get().unwrap();
        create_test_user(&conn, "login@example.com")
    };

    let response = app(state.clone())
        .oneshot(post_json(
            "/api/auth/login",
            &json!({"email": "Login@Example.com", "password": TEST_PASSWORD}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);

    let token = body["token"].as_str().expect("token should be a string");
    let session = state.sessions.verify(token).unwrap();
    assert_eq!(session.user_id, user.id);
    assert_eq!(session.email, "login@example.com");
    assert!(session.expires_at.unwrap() > now());
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email_are_401() {
    let state = create_test_app_state();
    {
        let conn = state.db.get().unwrap();
        create_test_user(&conn, "known@example.com");
    }

    for payload in [
        json!({"email": "known@example.com", "password": "wrong"}),
        json!({"email": "unknown@example.com", "password": TEST_PASSWORD}),
    ] {
        let response = app(state.clone())
            .oneshot(post_json("/api/auth/login", &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{payload}");
        let body = body_json(response).await;
        assert!(body.get("token").is_none());
    }
}

#[tokio::test]
async fn test_token_from_other_secret_is_rejected() {
    let state = create_test_app_state();
    let foreign = SessionSigner::new("some-other-secret", 3600)
        .unwrap()
        .issue("user-1", "a@example.com")
        .unwrap();

    assert!(state.sessions.verify(&foreign).is_err());
}

#[tokio::test]
async fn test_login_with_minimum_length_secret() {
    let mut state = create_test_app_state();
    state.sessions = SessionSigner::new("twelve-bytes", 3600).unwrap();
    {
        let conn = state.db.get().unwrap();
        create_test_user(&conn, "min@example.com");
    }

    let response = app(state.clone())
        .oneshot(post_json(
            "/api/auth/login",
            &json!({"email": "min@example.com", "password": TEST_PASSWORD}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let token = body_json(response).await["token"].as_str().unwrap().to_string();
    assert!(state.sessions.verify(&token).is_ok());

    // A secret the signer cannot use never makes it into a running server
    assert!(SessionSigner::new("short", 3600).is_err());
}

#[tokio::test(flavor = "current_thread")]
async fn test_password_hashing_does_not_block_other_requests() {
    let router = app(create_test_app_state());

    let register = router.clone().oneshot(post_json(
        "/api/auth/register",
        &json!({"email": "slow@example.com", "password": "pw"}),
    ));
    let health = router.oneshot(get("/health"));
    tokio::pin!(register);

    // Register is polled first; it must yield while argon2 runs elsewhere
    let first = tokio::select! {
        biased;
        _ = &mut register => "register",
        _ = health => "health",
    };
    assert_eq!(first, "health");

    let response = register.await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
