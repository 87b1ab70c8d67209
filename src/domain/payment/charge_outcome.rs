//! Terminal outcomes of an off-session charge attempt.
//!
//! A confirmed PaymentIntent either succeeds or comes back with a card error.
//! Card errors are not failures of this service: they tell the client how to
//! recover (authenticate the card, or collect a new one).

use serde::Serialize;

use super::card::CardSummary;
use super::order_amount::OrderAmount;

/// Stripe error code for a charge that needs 3-D Secure or similar.
pub const AUTHENTICATION_REQUIRED: &str = "authentication_required";

/// Code reported when a card error carries no code of its own.
pub const GENERIC_CARD_ERROR: &str = "card_error";

/// Result of one off-session charge attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ChargeOutcome {
    /// The saved card was charged without customer interaction.
    Succeeded {
        payment_intent_id: String,
        client_secret: String,
    },

    /// The bank asked for authentication; bring the customer back on-session
    /// to confirm the pending intent with the same payment method.
    RequiresAuthentication {
        payment_method_id: String,
        client_secret: String,
        amount: OrderAmount,
        card: CardSummary,
    },

    /// Declined for another reason (insufficient funds, lost card, ...);
    /// the customer must supply a new payment method.
    Declined {
        code: String,
        decline_code: Option<String>,
        client_secret: Option<String>,
    },

    /// Card error without a usable code.
    Failed { client_secret: Option<String> },
}

impl ChargeOutcome {
    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            ChargeOutcome::Succeeded { .. } => "succeeded",
            ChargeOutcome::RequiresAuthentication { .. } => "requires_authentication",
            ChargeOutcome::Declined { .. } => "declined",
            ChargeOutcome::Failed { .. } => "failed",
        }
    }

    /// Client secret of the intent the client should continue with, if any.
    pub fn client_secret(&self) -> Option<&str> {
        match self {
            ChargeOutcome::Succeeded { client_secret, .. }
            | ChargeOutcome::RequiresAuthentication { client_secret, .. } => Some(client_secret),
            ChargeOutcome::Declined { client_secret, .. }
            | ChargeOutcome::Failed { client_secret } => client_secret.as_deref(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ChargeOutcome::Succeeded { .. })
    }
}
