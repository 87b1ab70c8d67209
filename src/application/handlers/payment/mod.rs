//! Payment handlers.
//!
//! ## Commands
//! - Charging a saved card off-session
//! - Processing Stripe webhook deliveries

mod charge_card_off_session;
mod handle_webhook_event;

pub use charge_card_off_session::{
    ChargeCardOffSessionCommand, ChargeCardOffSessionHandler, ChargeError,
};
pub use handle_webhook_event::{
    HandleWebhookEventCommand, HandleWebhookEventHandler, WebhookOutcome, WebhookVerification,
};
