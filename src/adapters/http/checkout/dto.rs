//! HTTP DTOs (Data Transfer Objects) for checkout endpoints.
//!
//! These types define the JSON request/response structure the browser page
//! speaks. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::domain::payment::{CardSummary, ChargeOutcome, GENERIC_CARD_ERROR};

/// Message shown when a card error carries no code.
pub const GENERIC_CARD_ERROR_MESSAGE: &str = "The card could not be charged";

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to charge a saved card.
///
/// Any other field the client sends (an amount, say) is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeCardRequest {
    /// Payment method collected by Stripe.js (pm_...).
    #[serde(default)]
    pub payment_method: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of a `POST /charge-card-off-session` response that reached Stripe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChargeResponse {
    Succeeded(ChargeSucceededResponse),
    AuthenticationRequired(AuthenticationRequiredResponse),
    Declined(ChargeDeclinedResponse),
    Failed(ChargeFailedResponse),
}

/// The card was charged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeSucceededResponse {
    pub succeeded: bool,
    pub public_key: String,
    pub client_secret: String,
}

/// The customer must come back and authenticate the card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationRequiredResponse {
    /// Always `authentication_required`.
    pub error: String,
    pub payment_method: String,
    /// Amount of the pending intent in minor units.
    pub amount: i64,
    pub card: CardSummary,
    pub public_key: String,
    pub client_secret: String,
}

/// The card was declined; collect a new payment method.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeDeclinedResponse {
    /// Stripe error code, e.g. `card_declined`.
    pub error: String,
    pub public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

/// A card error without a code.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeFailedResponse {
    /// Always `card_error`.
    pub error: String,
    pub message: String,
    pub public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl ChargeResponse {
    /// Builds the response for an outcome, attaching the publishable key the
    /// page needs to continue with Stripe.js.
    pub fn from_outcome(outcome: ChargeOutcome, public_key: &str) -> Self {
        let public_key = public_key.to_string();
        match outcome {
            ChargeOutcome::Succeeded { client_secret, .. } => {
                ChargeResponse::Succeeded(ChargeSucceededResponse {
                    succeeded: true,
                    public_key,
                    client_secret,
                })
            }
            ChargeOutcome::RequiresAuthentication {
                payment_method_id,
                client_secret,
                amount,
                card,
            } => ChargeResponse::AuthenticationRequired(AuthenticationRequiredResponse {
                error: crate::domain::payment::AUTHENTICATION_REQUIRED.to_string(),
                payment_method: payment_method_id,
                amount: amount.minor_units,
                card,
                public_key,
                client_secret,
            }),
            ChargeOutcome::Declined {
                code,
                client_secret,
                ..
            } => ChargeResponse::Declined(ChargeDeclinedResponse {
                error: code,
                public_key,
                client_secret,
            }),
            ChargeOutcome::Failed { client_secret } => {
                ChargeResponse::Failed(ChargeFailedResponse {
                    error: GENERIC_CARD_ERROR.to_string(),
                    message: GENERIC_CARD_ERROR_MESSAGE.to_string(),
                    public_key,
                    client_secret,
                })
            }
        }
    }
}

/// Acknowledgement body for webhook deliveries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookAck {
    pub status: &'static str,
}

impl WebhookAck {
    pub fn success() -> Self {
        Self { status: "success" }
    }

    pub fn error() -> Self {
        Self { status: "error" }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response DTO
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
