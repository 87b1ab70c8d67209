//! Payment domain module.
//!
//! Pure types for charging a saved card off-session and for reading the
//! webhook events Stripe sends back.
//!
//! # Module Structure
//!
//! - `order_amount` - Server-side order pricing
//! - `card` - Displayable card metadata
//! - `charge_outcome` - Tagged result of an off-session charge
//! - `stripe_event` - Webhook event envelope and data objects
//! - `webhook_verifier` - HMAC-SHA256 signature verification
//! - `webhook_errors` - Webhook rejection reasons

mod card;
mod charge_outcome;
mod order_amount;
mod stripe_event;
mod webhook_errors;
mod webhook_verifier;

pub use card::CardSummary;
pub use charge_outcome::{ChargeOutcome, AUTHENTICATION_REQUIRED, GENERIC_CARD_ERROR};
pub use order_amount::{calculate_order_amount, Currency, OrderAmount};
pub use stripe_event::{
    LastPaymentError, PaymentEventType, PaymentIntentObject, PaymentMethodObject, StripeEvent,
    StripeEventData,
};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{SignatureHeader, StripeWebhookVerifier};

#[cfg(test)]
pub use stripe_event::StripeEventBuilder;
#[cfg(test)]
pub use webhook_verifier::compute_test_signature;
