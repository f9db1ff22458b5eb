//! Payment webhook receiver tests

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

#[path = "../common/mod.rs"]
mod common;
use common::*;

use license_server::crypto::sign_hmac_sha256_hex;

const RAZORPAY_SECRET: &str = "rzp_webhook_test_secret";
const RAZORPAY_PAYLOAD: &str = r#"{"event":"payment.captured","payload":{"payment":{"entity":{"id":"pay_1"}}}}"#;

fn razorpay_request(body: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/payment/razorpay/webhook")
        .header("content-type", "application/json");
    if let Some(sig) = signature {
        builder = builder.header("x-razorpay-signature", sig);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn assert_no_state_change(state: &AppState) {
    let conn = state.db.get().unwrap();
    assert_eq!(count_rows(&conn, "subscriptions"), 0);
    assert_eq!(count_rows(&conn, "licenses"), 0);
}

// ============ Razorpay ============

#[tokio::test]
async fn test_razorpay_without_secret_accepts_anything() {
    let state = create_test_app_state();

    let response = app(state.clone())
        .oneshot(razorpay_request(RAZORPAY_PAYLOAD, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
    assert_no_state_change(&state);
}

#[tokio::test]
async fn test_razorpay_valid_signature() {
    let state = create_test_app_state_with_webhook_secret(Some(RAZORPAY_SECRET));
    let signature = sign_hmac_sha256_hex(RAZORPAY_SECRET, RAZORPAY_PAYLOAD.as_bytes()).unwrap();

    let response = app(state.clone())
        .oneshot(razorpay_request(RAZORPAY_PAYLOAD, Some(&signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
    assert_no_state_change(&state);
}

#[tokio::test]
async fn test_razorpay_uppercase_signature_accepted() {
    let state = create_test_app_state_with_webhook_secret(Some(RAZORPAY_SECRET));
    let signature = sign_hmac_sha256_hex(RAZORPAY_SECRET, RAZORPAY_PAYLOAD.as_bytes())
        .unwrap()
        .to_uppercase();

    let response = app(state)
        .oneshot(razorpay_request(RAZORPAY_PAYLOAD, Some(&signature)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_razorpay_invalid_signature_rejected() {
    let state = create_test_app_state_with_webhook_secret(Some(RAZORPAY_SECRET));
    let signature = sign_hmac_sha256_hex("wrong_secret", RAZORPAY_PAYLOAD.as_bytes()).unwrap();

    let response = app(state)
        .oneshot(razorpay_request(RAZORPAY_PAYLOAD, Some(&signature)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_razorpay_modified_payload_rejected() {
    let state = create_test_app_state_with_webhook_secret(Some(RAZORPAY_SECRET));
    let signature = sign_hmac_sha256_hex(RAZORPAY_SECRET, RAZORPAY_PAYLOAD.as_bytes()).unwrap();
    let tampered = RAZORPAY_PAYLOAD.replace("pay_1", "pay_2");

    let response = app(state)
        .oneshot(razorpay_request(&tampered, Some(&signature)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_razorpay_missing_signature_rejected_when_secret_set() {
    let state = create_test_app_state_with_webhook_secret(Some(RAZORPAY_SECRET));

    let response = app(state)
        .oneshot(razorpay_request(RAZORPAY_PAYLOAD, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_razorpay_non_json_body_acknowledged() {
    let state = create_test_app_state();

    let response = app(state)
        .oneshot(razorpay_request("not json at all", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============ PayPal ============

#[tokio::test]
async fn test_paypal_always_acknowledged() {
    // A Razorpay secret has no bearing on PayPal deliveries
    let state = create_test_app_state_with_webhook_secret(Some(RAZORPAY_SECRET));

    for body in [
        r#"{"event_type":"BILLING.SUBSCRIPTION.ACTIVATED","resource":{"id":"I-1"}}"#,
        r#"{"no_event_type":true}"#,
        "",
    ] {
        let request = Request::builder()
            .method("POST")
            .uri("/api/payment/paypal/webhook")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = app(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{body:?}");
        assert_eq!(body_text(response).await, "ok");
    }

    assert_no_state_change(&state);
}
