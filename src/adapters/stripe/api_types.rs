//! Stripe REST API object types.
//!
//! These types represent Stripe objects as they arrive in API responses and
//! error bodies. They are designed to:
//! - Parse actual Stripe JSON accurately (unknown fields are ignored)
//! - Map to port types for the application layer

use serde::{Deserialize, Serialize};

use crate::domain::payment::CardSummary;
use crate::ports::{
    Customer, PaymentError, PaymentErrorCode, PaymentIntent, PaymentIntentStatus, PaymentMethod,
};

// ════════════════════════════════════════════════════════════════════════════════
// Shared Shapes
// ════════════════════════════════════════════════════════════════════════════════

/// A field Stripe returns either as an ID or, when expanded, as the object.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Expandable {
    Id(String),
    Object { id: String },
}

impl Expandable {
    pub fn id(&self) -> &str {
        match self {
            Expandable::Id(id) | Expandable::Object { id } => id,
        }
    }
}

/// Paginated list envelope (`"object": "list"`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeList<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Stripe Object Types
// ════════════════════════════════════════════════════════════════════════════════

/// Stripe Customer object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCustomer {
    /// Unique customer identifier (cus_...).
    pub id: String,

    /// Unix timestamp of creation.
    #[serde(default)]
    pub created: i64,
}

impl From<StripeCustomer> for Customer {
    fn from(customer: StripeCustomer) -> Self {
        Customer {
            id: customer.id,
            created_at: customer.created,
        }
    }
}

/// Stripe PaymentMethod object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePaymentMethod {
    /// Unique payment method identifier (pm_...).
    pub id: String,

    /// Payment method type (card, sepa_debit, ...).
    #[serde(rename = "type", default)]
    pub method_type: String,

    /// Customer the method is attached to.
    #[serde(default)]
    pub customer: Option<Expandable>,

    /// Card details when `type == "card"`.
    #[serde(default)]
    pub card: Option<CardSummary>,
}

impl From<StripePaymentMethod> for PaymentMethod {
    fn from(method: StripePaymentMethod) -> Self {
        PaymentMethod {
            id: method.id,
            customer_id: method.customer.map(|c| c.id().to_string()),
            card: method.card,
        }
    }
}

/// Stripe PaymentIntent object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePaymentIntent {
    /// Unique PaymentIntent identifier (pi_...).
    pub id: String,

    /// Amount in minor units.
    #[serde(default)]
    pub amount: i64,

    /// Currency (lowercase).
    #[serde(default)]
    pub currency: String,

    /// Lifecycle status.
    pub status: PaymentIntentStatus,

    /// Secret handed to the browser.
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Attached payment method.
    #[serde(default)]
    pub payment_method: Option<Expandable>,

    /// Attached customer.
    #[serde(default)]
    pub customer: Option<Expandable>,
}

impl From<StripePaymentIntent> for PaymentIntent {
    fn from(intent: StripePaymentIntent) -> Self {
        PaymentIntent {
            id: intent.id,
            amount: intent.amount,
            currency: intent.currency,
            status: intent.status,
            client_secret: intent.client_secret.unwrap_or_default(),
            payment_method_id: intent.payment_method.map(|pm| pm.id().to_string()),
            customer_id: intent.customer.map(|c| c.id().to_string()),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Bodies
// ════════════════════════════════════════════════════════════════════════════════

/// Body of every non-2xx Stripe response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeErrorEnvelope {
    pub error: StripeApiError,
}

/// Stripe error object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeApiError {
    /// api_error, card_error, idempotency_error or invalid_request_error.
    #[serde(rename = "type", default)]
    pub error_type: String,

    /// Short machine-readable code (e.g. `authentication_required`).
    #[serde(default)]
    pub code: Option<String>,

    /// Issuer decline reason for card errors.
    #[serde(default)]
    pub decline_code: Option<String>,

    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,

    /// Parameter the error relates to.
    #[serde(default)]
    pub param: Option<String>,

    /// Intent left behind by a failed confirmation.
    #[serde(default)]
    pub payment_intent: Option<StripePaymentIntent>,

    /// Payment method involved in a card error.
    #[serde(default)]
    pub payment_method: Option<StripePaymentMethod>,
}

impl StripeApiError {
    /// Converts the error into a port error, using the HTTP status to
    /// classify failures Stripe reports under a generic type.
    pub fn into_payment_error(self, status: u16) -> PaymentError {
        let code = match (status, self.error_type.as_str()) {
            (401, _) => PaymentErrorCode::AuthenticationError,
            (429, _) => PaymentErrorCode::RateLimitExceeded,
            (_, "card_error") => PaymentErrorCode::CardError,
            (404, _) => PaymentErrorCode::NotFound,
            (_, "invalid_request_error") | (_, "idempotency_error") => {
                PaymentErrorCode::InvalidRequest
            }
            (_, "api_error") => PaymentErrorCode::ProviderError,
            _ if status >= 500 => PaymentErrorCode::ProviderError,
            _ => PaymentErrorCode::Unknown,
        };

        let message = self
            .message
            .unwrap_or_else(|| format!("Stripe returned HTTP {}", status));
        let mut error = PaymentError::new(code, message);
        if let Some(provider_code) = self.code.filter(|c| !c.is_empty()) {
            error = error.with_provider_code(provider_code);
        }
        if let Some(decline_code) = self.decline_code {
            error = error.with_decline_code(decline_code);
        }
        if let Some(intent) = self.payment_intent {
            error = error.with_payment_intent(intent.into());
        }
        if let Some(method) = self.payment_method {
            error = error.with_payment_method(method.into());
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_customer_object() {
        let json = r#"{
            "id": "cus_test",
            "object": "customer",
            "created": 1704067200,
            "invoice_settings": {"default_payment_method": null}
        }"#;

        let customer: StripeCustomer = serde_json::from_str(json).unwrap();
        let customer: Customer = customer.into();

        assert_eq!(customer.id, "cus_test");
        assert_eq!(customer.created_at, 1704067200);
    }

    #[test]
    fn parse_payment_method_list() {
        let json = r#"{
            "object": "list",
            "url": "/v1/payment_methods",
            "has_more": false,
            "data": [{
                "id": "pm_1",
                "object": "payment_method",
                "type": "card",
                "customer": "cus_test",
                "card": {"brand": "visa", "last4": "4242", "exp_month": 8, "exp_year": 2030}
            }]
        }"#;

        let list: StripeList<StripePaymentMethod> = serde_json::from_str(json).unwrap();
        assert_eq!(list.data.len(), 1);

        let method: PaymentMethod = list.data[0].clone().into();
        assert_eq!(method.id, "pm_1");
        assert_eq!(method.customer_id.as_deref(), Some("cus_test"));
        assert_eq!(method.card.unwrap().last4, "4242");
    }

    #[test]
    fn parse_empty_list() {
        let list: StripeList<StripePaymentMethod> =
            serde_json::from_str(r#"{"object":"list","data":[],"has_more":false}"#).unwrap();
        assert!(list.data.is_empty());
    }

    #[test]
    fn parse_succeeded_payment_intent() {
        let json = r#"{
            "id": "pi_1",
            "object": "payment_intent",
            "amount": 1400,
            "currency": "usd",
            "status": "succeeded",
            "client_secret": "pi_1_secret_abc",
            "payment_method": "pm_1",
            "customer": "cus_1"
        }"#;

        let intent: StripePaymentIntent = serde_json::from_str(json).unwrap();
        let intent: PaymentIntent = intent.into();

        assert_eq!(intent.status, PaymentIntentStatus::Succeeded);
        assert_eq!(intent.client_secret, "pi_1_secret_abc");
        assert_eq!(intent.payment_method_id.as_deref(), Some("pm_1"));
        assert_eq!(intent.amount, 1400);
    }

    #[test]
    fn expanded_payment_method_reads_id() {
        let json = r#"{
            "id": "pi_1",
            "status": "requires_action",
            "payment_method": {"id": "pm_expanded", "object": "payment_method", "type": "card"}
        }"#;

        let intent: StripePaymentIntent = serde_json::from_str(json).unwrap();
        assert_eq!(intent.payment_method.unwrap().id(), "pm_expanded");
    }

    #[test]
    fn authentication_required_error_keeps_intent_and_method() {
        let json = r#"{
            "error": {
                "type": "card_error",
                "code": "authentication_required",
                "decline_code": "authentication_required",
                "message": "This payment requires authentication.",
                "payment_intent": {
                    "id": "pi_auth",
                    "amount": 1400,
                    "currency": "usd",
                    "status": "requires_payment_method",
                    "client_secret": "pi_auth_secret"
                },
                "payment_method": {
                    "id": "pm_auth",
                    "type": "card",
                    "card": {"brand": "visa", "last4": "3155"}
                }
            }
        }"#;

        let envelope: StripeErrorEnvelope = serde_json::from_str(json).unwrap();
        let err = envelope.error.into_payment_error(402);

        assert_eq!(err.code, PaymentErrorCode::CardError);
        assert_eq!(err.provider_code.as_deref(), Some("authentication_required"));
        assert_eq!(err.payment_intent.unwrap().client_secret, "pi_auth_secret");
        assert_eq!(err.payment_method.unwrap().card.unwrap().last4, "3155");
    }

    #[test]
    fn error_classification_uses_status_and_type() {
        let err = |status: u16, ty: &str| StripeApiError {
            error_type: ty.to_string(),
            code: None,
            decline_code: None,
            message: None,
            param: None,
            payment_intent: None,
            payment_method: None,
        }
        .into_payment_error(status);

        assert_eq!(err(401, "invalid_request_error").code, PaymentErrorCode::AuthenticationError);
        assert_eq!(err(429, "invalid_request_error").code, PaymentErrorCode::RateLimitExceeded);
        assert_eq!(err(404, "invalid_request_error").code, PaymentErrorCode::NotFound);
        assert_eq!(err(400, "invalid_request_error").code, PaymentErrorCode::InvalidRequest);
        assert_eq!(err(402, "card_error").code, PaymentErrorCode::CardError);
        assert_eq!(err(500, "api_error").code, PaymentErrorCode::ProviderError);
        assert_eq!(err(503, "").code, PaymentErrorCode::ProviderError);
    }

    #[test]
    fn empty_code_is_treated_as_missing() {
        let json = r#"{"error": {"type": "card_error", "code": "", "message": "declined"}}"#;
        let envelope: StripeErrorEnvelope = serde_json::from_str(json).unwrap();
        let err = envelope.error.into_payment_error(402);
        assert!(err.provider_code.is_none());
    }
}
