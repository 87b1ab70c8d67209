//! Payment provider port for external payment processing.
//!
//! Defines the contract the off-session charge flow needs from a payment
//! gateway (e.g., Stripe): customers, saved payment methods, and
//! PaymentIntents created and confirmed in one step.
//!
//! # Design
//!
//! - **Gateway agnostic**: Interface works with any payment provider
//! - **Card errors carry context**: a declined confirmation returns the
//!   pending PaymentIntent and the payment method so the caller can recover

use crate::domain::payment::{CardSummary, OrderAmount};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a customer with the given payment method attached.
    ///
    /// Fails if the payment method does not exist or already belongs to
    /// another customer.
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError>;

    /// List the customer's saved card payment methods, most recent first.
    async fn list_card_payment_methods(
        &self,
        customer_id: &str,
    ) -> Result<Vec<PaymentMethod>, PaymentError>;

    /// Create a PaymentIntent and confirm it in the same call.
    ///
    /// Card declines (including "authentication required") come back as a
    /// `PaymentError` with `code == CardError` and the pending intent attached.
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError>;
}

/// Request to create a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    /// Payment method to attach to the new customer.
    pub payment_method_id: String,
}

/// Customer in the payment system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Provider's customer ID.
    pub id: String,

    /// When the customer was created (provider timestamp).
    pub created_at: i64,
}

/// A saved payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Provider's payment method ID (pm_...).
    pub id: String,

    /// Customer the method is attached to.
    pub customer_id: Option<String>,

    /// Card details when the method is a card.
    pub card: Option<CardSummary>,
}

/// Request to create (and optionally confirm) a PaymentIntent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentIntentRequest {
    /// Amount and currency, always computed server-side.
    pub amount: OrderAmount,

    /// Provider's customer ID.
    pub customer_id: String,

    /// Payment method to charge.
    pub payment_method_id: String,

    /// The customer is not present to complete authentication.
    pub off_session: bool,

    /// Confirm immediately instead of leaving the intent for later.
    pub confirm: bool,
}

impl CreatePaymentIntentRequest {
    /// An intent confirmed immediately without the customer present.
    pub fn off_session(
        amount: OrderAmount,
        customer_id: impl Into<String>,
        payment_method_id: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            customer_id: customer_id.into(),
            payment_method_id: payment_method_id.into(),
            off_session: true,
            confirm: true,
        }
    }
}

/// PaymentIntent in the payment system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider's PaymentIntent ID (pi_...).
    pub id: String,

    /// Amount in minor units.
    pub amount: i64,

    /// Lowercase currency code.
    pub currency: String,

    /// Lifecycle status.
    pub status: PaymentIntentStatus,

    /// Secret the browser uses to confirm or inspect the intent.
    pub client_secret: String,

    /// Payment method attached to the intent.
    pub payment_method_id: Option<String>,

    /// Customer attached to the intent.
    pub customer_id: Option<String>,
}

/// PaymentIntent status from payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    /// Waiting on customer action such as 3-D Secure.
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
    /// Unknown status from provider.
    #[serde(other)]
    Unknown,
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error code, e.g. `authentication_required` or `card_declined`.
    pub provider_code: Option<String>,

    /// Issuer's decline reason, e.g. `insufficient_funds`.
    pub decline_code: Option<String>,

    /// Whether the operation can be retried.
    pub retryable: bool,

    /// The intent left behind by a failed confirmation.
    pub payment_intent: Option<PaymentIntent>,

    /// The payment method involved in a card error.
    pub payment_method: Option<PaymentMethod>,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            decline_code: None,
            retryable: code.is_retryable(),
            payment_intent: None,
            payment_method: None,
        }
    }

    /// Create with provider code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Create with issuer decline code.
    pub fn with_decline_code(mut self, code: impl Into<String>) -> Self {
        self.decline_code = Some(code.into());
        self
    }

    /// Attach the intent the failed call left behind.
    pub fn with_payment_intent(mut self, intent: PaymentIntent) -> Self {
        self.payment_intent = Some(intent);
        self
    }

    /// Attach the payment method involved in the failure.
    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create a card error (decline, authentication required, ...).
    pub fn card_error(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::CardError, message)
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidRequest, message)
    }

    /// Create a provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }

    /// True for the card-decline class that the charge flow recovers from.
    pub fn is_card_error(&self) -> bool {
        self.code == PaymentErrorCode::CardError
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue or timeout.
    NetworkError,

    /// API authentication failed (bad secret key).
    AuthenticationError,

    /// Card could not be charged; see `provider_code`.
    CardError,

    /// Request rejected as invalid (unknown payment method, bad params).
    InvalidRequest,

    /// Resource not found.
    NotFound,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Provider API error.
    ProviderError,

    /// Unknown error.
    Unknown,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError | PaymentErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::CardError => "card_error",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
