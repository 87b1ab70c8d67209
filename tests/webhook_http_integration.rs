//! Integration tests for the webhook endpoint.
//!
//! Payloads are signed the way Stripe signs them: HMAC-SHA256 over
//! `"<timestamp>.<body>"`, hex encoded in a `t=...,v1=...` header.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use tower::ServiceExt;

use saved_card_charge::adapters::http::checkout::{checkout_router, STRIPE_SIGNATURE_HEADER};
use saved_card_charge::adapters::http::CheckoutAppState;
use saved_card_charge::adapters::stripe::MockPaymentProvider;
use saved_card_charge::application::WebhookVerification;

const SECRET: &str = "whsec_integration_secret";

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app_with(verification: WebhookVerification) -> (Router, tempfile::TempDir) {
    let static_dir = tempfile::tempdir().unwrap();
    let state = CheckoutAppState::new(
        Arc::new(MockPaymentProvider::new()),
        verification,
        "pk_test_integration",
    );
    (checkout_router(static_dir.path()).with_state(state), static_dir)
}

fn signed_app() -> (Router, tempfile::TempDir) {
    app_with(WebhookVerification::from_secret(Some(SECRET)))
}

fn sign(secret: &str, timestamp: i64, payload: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(format!("{}.{}", timestamp, payload).as_bytes());
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

fn event(event_type: &str, object: Value) -> String {
    json!({
        "id": "evt_integration",
        "object": "event",
        "type": event_type,
        "created": chrono::Utc::now().timestamp(),
        "livemode": false,
        "data": { "object": object }
    })
    .to_string()
}

async fn post_webhook(app: Router, payload: String, signature: Option<String>) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        request = request.header(STRIPE_SIGNATURE_HEADER, signature);
    }

    let response = app
        .oneshot(request.body(Body::from(payload)).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

// =============================================================================
// Signed Deliveries
// =============================================================================

#[tokio::test]
async fn correctly_signed_payment_succeeded_is_acknowledged() {
    let (app, _dir) = signed_app();
    let payload = event(
        "payment_intent.succeeded",
        json!({"id": "pi_1", "object": "payment_intent", "payment_method": "pm_1"}),
    );
    let signature = sign(SECRET, chrono::Utc::now().timestamp(), &payload);

    let (status, body) = post_webhook(app, payload, Some(signature)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success"}));
}

#[tokio::test]
async fn payment_failed_and_attached_events_are_acknowledged() {
    for (event_type, object) in [
        (
            "payment_intent.payment_failed",
            json!({"id": "pi_2", "last_payment_error": {"message": "Your card was declined."}}),
        ),
        (
            "payment_method.attached",
            json!({"id": "pm_2", "customer": "cus_2"}),
        ),
    ] {
        let (app, _dir) = signed_app();
        let payload = event(event_type, object);
        let signature = sign(SECRET, chrono::Utc::now().timestamp(), &payload);

        let (status, body) = post_webhook(app, payload, Some(signature)).await;

        assert_eq!(status, StatusCode::OK, "{}", event_type);
        assert_eq!(body, json!({"status": "success"}));
    }
}

#[tokio::test]
async fn unrecognised_event_type_is_acknowledged() {
    let (app, _dir) = signed_app();
    let payload = event("invoice.created", json!({"id": "in_1"}));
    let signature = sign(SECRET, chrono::Utc::now().timestamp(), &payload);

    let (status, body) = post_webhook(app, payload, Some(signature)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success"}));
}

#[tokio::test]
async fn any_matching_v1_signature_is_accepted() {
    let (app, _dir) = signed_app();
    let payload = event("payment_intent.succeeded", json!({"id": "pi_1"}));
    let timestamp = chrono::Utc::now().timestamp();
    let good = sign(SECRET, timestamp, &payload);
    let good_v1 = good.split("v1=").nth(1).unwrap();
    let header = format!("t={},v1={},v1={}", timestamp, "00".repeat(32), good_v1);

    let (status, _) = post_webhook(app, payload, Some(header)).await;

    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Rejected Deliveries
// =============================================================================

#[tokio::test]
async fn wrong_secret_is_rejected() {
    let (app, _dir) = signed_app();
    let payload = event("payment_intent.succeeded", json!({"id": "pi_1"}));
    let signature = sign("whsec_someone_else", chrono::Utc::now().timestamp(), &payload);

    let (status, body) = post_webhook(app, payload, Some(signature)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"status": "error"}));
}

#[tokio::test]
async fn missing_signature_is_rejected_when_secret_configured() {
    let (app, _dir) = signed_app();
    let payload = event("payment_intent.succeeded", json!({"id": "pi_1"}));

    let (status, body) = post_webhook(app, payload, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"status": "error"}));
}

#[tokio::test]
async fn stale_timestamp_is_rejected() {
    let (app, _dir) = signed_app();
    let payload = event("payment_intent.succeeded", json!({"id": "pi_1"}));
    let signature = sign(SECRET, chrono::Utc::now().timestamp() - 3600, &payload);

    let (status, _) = post_webhook(app, payload, Some(signature)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_signature_header_is_rejected() {
    let (app, _dir) = signed_app();
    let payload = event("payment_intent.succeeded", json!({"id": "pi_1"}));

    let (status, _) = post_webhook(app, payload, Some("garbage".to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Unsigned Mode
// =============================================================================

#[tokio::test]
async fn unsigned_mode_accepts_plain_events() {
    let (app, _dir) = app_with(WebhookVerification::Unsigned);
    let payload = event("payment_method.attached", json!({"id": "pm_1"}));

    let (status, body) = post_webhook(app, payload, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success"}));
}

#[tokio::test]
async fn unsigned_mode_rejects_invalid_json() {
    let (app, _dir) = app_with(WebhookVerification::Unsigned);

    let (status, _) = post_webhook(app, "not json".to_string(), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
