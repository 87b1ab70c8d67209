//! Webhook error types for Stripe webhook handling.
//!
//! Every variant is a rejection of the delivery. The HTTP layer turns them
//! into a bare status code and never echoes the detail to the caller.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur while accepting a webhook delivery.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// A signing secret is configured but the request carried no signature.
    #[error("Missing Stripe-Signature header")]
    MissingSignature,

    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Webhook timestamp is outside the acceptable window (5 minutes).
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Event timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Failed to parse webhook payload or signature header.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl WebhookError {
    /// Maps the error to an HTTP status code.
    ///
    /// Stripe retries non-2xx deliveries, so a forged or stale request keeps
    /// failing and a genuine one that hit a transient parse issue is resent.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature
            | WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange
            | WebhookError::InvalidTimestamp
            | WebhookError::ParseError(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// True when the rejection came from the authenticity check rather than
    /// from the payload itself.
    pub fn is_authenticity_failure(&self) -> bool {
        !matches!(self, WebhookError::ParseError(_))
    }
}
