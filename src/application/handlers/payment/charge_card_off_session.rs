//! ChargeCardOffSessionHandler - Command handler for charging a saved card
//! while the customer is away.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::payment::{
    calculate_order_amount, CardSummary, ChargeOutcome, OrderAmount, AUTHENTICATION_REQUIRED,
};
use crate::ports::{
    CreateCustomerRequest, CreatePaymentIntentRequest, PaymentError, PaymentIntentStatus,
    PaymentMethod, PaymentProvider,
};

/// Command to charge the card behind a payment method.
#[derive(Debug, Clone)]
pub struct ChargeCardOffSessionCommand {
    /// Payment method collected by the browser (pm_...).
    pub payment_method_id: String,
}

/// Failures that are not card outcomes.
#[derive(Debug, Error)]
pub enum ChargeError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Customer has no saved card payment method")]
    NoCardPaymentMethod,

    #[error("Payment provider error: {0}")]
    Provider(#[from] PaymentError),
}

/// Handler for off-session charges.
///
/// Creates a customer from the payment method, picks the customer's first
/// saved card and confirms a PaymentIntent for the server-computed amount in
/// one call. Card errors become `ChargeOutcome` variants; everything else is
/// a `ChargeError`.
///
/// A confirmation that returns without error is reported as
/// `ChargeOutcome::Succeeded` whatever the intent's status. An off-session
/// intent that is still `processing` settles through the
/// `payment_intent.succeeded` or `payment_intent.payment_failed` webhook, so
/// the status is only logged here.
pub struct ChargeCardOffSessionHandler {
    payment_provider: Arc<dyn PaymentProvider>,
}

impl ChargeCardOffSessionHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>) -> Self {
        Self { payment_provider }
    }

    #[tracing::instrument(skip_all, fields(payment_method = %cmd.payment_method_id))]
    pub async fn handle(
        &self,
        cmd: ChargeCardOffSessionCommand,
    ) -> Result<ChargeOutcome, ChargeError> {
        let payment_method_id = cmd.payment_method_id.trim();
        if payment_method_id.is_empty() {
            return Err(ChargeError::InvalidRequest(
                "paymentMethod is required".to_string(),
            ));
        }

        // 1. Customer with the payment method attached
        let customer = self
            .payment_provider
            .create_customer(CreateCustomerRequest {
                payment_method_id: payment_method_id.to_string(),
            })
            .await?;
        tracing::debug!(customer_id = %customer.id, "Customer created");

        // 2. First saved card
        let method = self
            .payment_provider
            .list_card_payment_methods(&customer.id)
            .await?
            .into_iter()
            .next()
            .ok_or(ChargeError::NoCardPaymentMethod)?;
        tracing::debug!(card_payment_method = %method.id, "Card payment methods listed");

        // 3. Confirm off-session for the server-side amount
        let amount = calculate_order_amount();
        let request = CreatePaymentIntentRequest::off_session(amount, &customer.id, &method.id);

        let outcome = match self.payment_provider.create_payment_intent(request).await {
            Ok(intent) => {
                if intent.status != PaymentIntentStatus::Succeeded {
                    tracing::warn!(
                        payment_intent_id = %intent.id,
                        status = ?intent.status,
                        "Confirmed intent returned without error but has not succeeded"
                    );
                }
                ChargeOutcome::Succeeded {
                    payment_intent_id: intent.id,
                    client_secret: intent.client_secret,
                }
            }
            Err(error) if error.is_card_error() => card_error_outcome(error, amount, &method),
            Err(error) => {
                tracing::debug!(error = %error, "PaymentIntent attempt failed");
                return Err(error.into());
            }
        };

        tracing::debug!(outcome = outcome.label(), "PaymentIntent attempted");
        Ok(outcome)
    }
}

/// Maps a card error onto the outcome the client recovers from.
fn card_error_outcome(
    error: PaymentError,
    amount: OrderAmount,
    charged_method: &PaymentMethod,
) -> ChargeOutcome {
    let client_secret = error
        .payment_intent
        .as_ref()
        .map(|intent| intent.client_secret.clone())
        .filter(|secret| !secret.is_empty());

    match (error.provider_code, client_secret) {
        (Some(code), Some(client_secret)) if code == AUTHENTICATION_REQUIRED => {
            let method = error.payment_method.unwrap_or_else(|| charged_method.clone());
            let card = method
                .card
                .or_else(|| charged_method.card.clone())
                .unwrap_or_else(CardSummary::default);
            ChargeOutcome::RequiresAuthentication {
                payment_method_id: method.id,
                client_secret,
                amount,
                card,
            }
        }
        (Some(code), client_secret) => ChargeOutcome::Declined {
            code,
            decline_code: error.decline_code,
            client_secret,
        },
        (None, client_secret) => ChargeOutcome::Failed { client_secret },
    }
}
