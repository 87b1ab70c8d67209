//! HTTP handlers for checkout endpoints.
//!
//! These handlers connect Axum routes to application layer command handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::application::handlers::payment::{
    ChargeCardOffSessionCommand, ChargeCardOffSessionHandler, ChargeError,
    HandleWebhookEventCommand, HandleWebhookEventHandler, WebhookVerification,
};
use crate::ports::{PaymentErrorCode, PaymentProvider};

use super::dto::{ChargeCardRequest, ChargeResponse, ErrorResponse, WebhookAck};

/// Header Stripe signs webhook deliveries with.
pub const STRIPE_SIGNATURE_HEADER: &str = "Stripe-Signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned for each request; every field is cheap to clone.
#[derive(Clone)]
pub struct CheckoutAppState {
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub webhook_verification: WebhookVerification,
    /// Publishable key echoed to the page for Stripe.js.
    pub publishable_key: Arc<str>,
}

impl CheckoutAppState {
    pub fn new(
        payment_provider: Arc<dyn PaymentProvider>,
        webhook_verification: WebhookVerification,
        publishable_key: impl Into<String>,
    ) -> Self {
        Self {
            payment_provider,
            webhook_verification,
            publishable_key: Arc::from(publishable_key.into()),
        }
    }

    /// Create handlers on demand from the shared state.
    pub fn charge_handler(&self) -> ChargeCardOffSessionHandler {
        ChargeCardOffSessionHandler::new(self.payment_provider.clone())
    }

    pub fn webhook_handler(&self) -> HandleWebhookEventHandler {
        HandleWebhookEventHandler::new(self.webhook_verification.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /charge-card-off-session - Charge the card behind a payment method
///
/// Card errors are answered with 200 so the page can act on them.
pub async fn charge_card_off_session(
    State(state): State<CheckoutAppState>,
    request: Result<Json<ChargeCardRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let Json(request) =
        request.map_err(|rejection| ChargeError::InvalidRequest(rejection.body_text()))?;

    let handler = state.charge_handler();
    let cmd = ChargeCardOffSessionCommand {
        payment_method_id: request.payment_method,
    };

    let outcome = handler.handle(cmd).await?;
    tracing::info!(outcome = outcome.label(), "Off-session charge attempted");

    Ok(Json(ChargeResponse::from_outcome(
        outcome,
        &state.publishable_key,
    )))
}

/// POST /webhook - Receive a Stripe event
///
/// Rejections carry only a status; the reason stays in the logs.
pub async fn handle_webhook(
    State(state): State<CheckoutAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let handler = state.webhook_handler();
    let cmd = HandleWebhookEventCommand {
        payload: body.to_vec(),
        signature,
    };

    match handler.handle(cmd) {
        Ok(_) => (StatusCode::OK, Json(WebhookAck::success())),
        Err(err) => (err.status_code(), Json(WebhookAck::error())),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts charge errors to HTTP responses.
#[derive(Debug)]
pub struct CheckoutApiError(ChargeError);

impl From<ChargeError> for CheckoutApiError {
    fn from(err: ChargeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for CheckoutApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code, message) = match &self.0 {
            ChargeError::InvalidRequest(message) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED", message.clone())
            }
            ChargeError::NoCardPaymentMethod => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NO_CARD_PAYMENT_METHOD",
                "The customer has no saved card to charge".to_string(),
            ),
            ChargeError::Provider(err) => {
                tracing::error!(
                    code = %err.code,
                    provider_code = ?err.provider_code,
                    error = %err.message,
                    "Payment provider request failed"
                );
                let status = match err.code {
                    PaymentErrorCode::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
                    _ => StatusCode::BAD_GATEWAY,
                };
                (
                    status,
                    "PAYMENT_PROVIDER_ERROR",
                    "The payment provider could not process the request".to_string(),
                )
            }
        };

        let body = ErrorResponse::new(error_code, message);
        (status, Json(body)).into_response()
    }
}
