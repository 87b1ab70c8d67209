//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod payment;

pub use payment::{
    ChargeCardOffSessionCommand, ChargeCardOffSessionHandler, ChargeError,
    HandleWebhookEventCommand, HandleWebhookEventHandler, WebhookOutcome, WebhookVerification,
};
