//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Scripted charge results (success, authentication required, declines)
//! - Error injection per method
//! - Call tracking and captured PaymentIntent requests

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::payment::{CardSummary, AUTHENTICATION_REQUIRED};
use crate::ports::{
    CreateCustomerRequest, CreatePaymentIntentRequest, Customer, PaymentError, PaymentIntent,
    PaymentIntentStatus, PaymentMethod, PaymentProvider,
};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::declining_with("card_declined", Some("insufficient_funds"));
///
/// let handler = ChargeCardOffSessionHandler::new(Arc::new(mock.clone()));
/// let outcome = handler.handle(command).await?;
///
/// assert_eq!(mock.call_count("create_payment_intent"), 1);
/// ```
#[derive(Default)]
pub struct MockPaymentProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// What `create_payment_intent` does.
    charge_behavior: ChargeBehavior,

    /// Card methods returned for every customer; `None` uses a default visa.
    card_payment_methods: Option<Vec<PaymentMethod>>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,

    /// Every PaymentIntent request received.
    intent_requests: Vec<CreatePaymentIntentRequest>,

    /// Sequence for generated IDs.
    sequence: u32,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

/// How the mock answers a confirmation.
#[derive(Debug, Clone, Default)]
enum ChargeBehavior {
    #[default]
    Succeed,

    /// No error, but the intent is left in the given status.
    Settle(PaymentIntentStatus),

    /// Card error `authentication_required` with the pending intent.
    RequireAuthentication,

    /// Card error with the given code and optional issuer reason.
    Decline {
        code: String,
        decline_code: Option<String>,
    },

    /// Card error that carries no code at all.
    DeclineWithoutCode,
}

impl MockPaymentProvider {
    /// Create a new mock provider whose charges succeed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Charges succeed immediately.
    pub fn charging_succeeds() -> Self {
        Self::new()
    }

    /// Charges fail because the issuer wants the customer to authenticate.
    pub fn requiring_authentication() -> Self {
        let mock = Self::new();
        mock.set_charge_behavior(ChargeBehavior::RequireAuthentication);
        mock
    }

    /// Charges are declined with the given code.
    pub fn declining_with(code: &str, decline_code: Option<&str>) -> Self {
        let mock = Self::new();
        mock.set_charge_behavior(ChargeBehavior::Decline {
            code: code.to_string(),
            decline_code: decline_code.map(str::to_string),
        });
        mock
    }

    /// Confirmation returns without error, leaving the intent in `status`.
    pub fn settling_as(status: PaymentIntentStatus) -> Self {
        let mock = Self::new();
        mock.set_charge_behavior(ChargeBehavior::Settle(status));
        mock
    }

    /// Charges fail with a card error that has no code.
    pub fn declining_without_code() -> Self {
        let mock = Self::new();
        mock.set_charge_behavior(ChargeBehavior::DeclineWithoutCode);
        mock
    }

    /// The new customer ends up with no saved cards.
    pub fn without_card_payment_methods() -> Self {
        let mock = Self::new();
        mock.set_card_payment_methods(Vec::new());
        mock
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Set the card methods returned by `list_card_payment_methods`.
    pub fn set_card_payment_methods(&self, methods: Vec<PaymentMethod>) {
        self.state().card_payment_methods = Some(methods);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.state()
            .method_errors
            .insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        self.state().method_errors.clear();
    }

    fn set_charge_behavior(&self, behavior: ChargeBehavior) {
        self.state().charge_behavior = behavior;
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|c| c.method == method)
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// PaymentIntent requests in the order they were received.
    pub fn intent_requests(&self) -> Vec<CreatePaymentIntentRequest> {
        self.state().intent_requests.clone()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        match self.state().method_errors.get(method) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut state = self.state();
        state.sequence += 1;
        format!("{}_mock_{}", prefix, state.sequence)
    }
}

impl Clone for MockPaymentProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn default_card_method(customer_id: &str) -> PaymentMethod {
    PaymentMethod {
        id: "pm_mock_visa".to_string(),
        customer_id: Some(customer_id.to_string()),
        card: Some(CardSummary {
            exp_month: Some(12),
            exp_year: Some(2034),
            ..CardSummary::new("visa", "3155")
        }),
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError> {
        self.record_call("create_customer", vec![request.payment_method_id.clone()]);
        self.check_error("create_customer")?;

        Ok(Customer {
            id: self.next_id("cus"),
            created_at: chrono::Utc::now().timestamp(),
        })
    }

    async fn list_card_payment_methods(
        &self,
        customer_id: &str,
    ) -> Result<Vec<PaymentMethod>, PaymentError> {
        self.record_call("list_card_payment_methods", vec![customer_id.to_string()]);
        self.check_error("list_card_payment_methods")?;

        let configured = self.state().card_payment_methods.clone();
        Ok(configured.unwrap_or_else(|| vec![default_card_method(customer_id)]))
    }

    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        self.record_call(
            "create_payment_intent",
            vec![
                request.customer_id.clone(),
                request.payment_method_id.clone(),
                request.amount.minor_units.to_string(),
            ],
        );
        self.state().intent_requests.push(request.clone());
        self.check_error("create_payment_intent")?;

        let id = self.next_id("pi");
        let mut intent = PaymentIntent {
            client_secret: format!("{}_secret_mock", id),
            id,
            amount: request.amount.minor_units,
            currency: request.amount.currency.as_str().to_string(),
            status: PaymentIntentStatus::Succeeded,
            payment_method_id: Some(request.payment_method_id.clone()),
            customer_id: Some(request.customer_id.clone()),
        };

        let behavior = self.state().charge_behavior.clone();
        match behavior {
            ChargeBehavior::Succeed => Ok(intent),
            ChargeBehavior::Settle(status) => {
                intent.status = status;
                Ok(intent)
            }
            ChargeBehavior::RequireAuthentication => {
                intent.status = PaymentIntentStatus::RequiresPaymentMethod;
                let method = self
                    .state()
                    .card_payment_methods
                    .as_ref()
                    .and_then(|methods| {
                        methods
                            .iter()
                            .find(|m| m.id == request.payment_method_id)
                            .cloned()
                    })
                    .unwrap_or_else(|| PaymentMethod {
                        id: request.payment_method_id.clone(),
                        ..default_card_method(&request.customer_id)
                    });
                Err(
                    PaymentError::card_error("This payment requires authentication.")
                        .with_provider_code(AUTHENTICATION_REQUIRED)
                        .with_decline_code(AUTHENTICATION_REQUIRED)
                        .with_payment_intent(intent)
                        .with_payment_method(method),
                )
            }
            ChargeBehavior::Decline { code, decline_code } => {
                intent.status = PaymentIntentStatus::RequiresPaymentMethod;
                let mut error = PaymentError::card_error("Your card was declined.")
                    .with_provider_code(code)
                    .with_payment_intent(intent);
                if let Some(decline_code) = decline_code {
                    error = error.with_decline_code(decline_code);
                }
                Err(error)
            }
            ChargeBehavior::DeclineWithoutCode => {
                intent.status = PaymentIntentStatus::RequiresPaymentMethod;
                Err(PaymentError::card_error("The card could not be charged.")
                    .with_payment_intent(intent))
            }
        }
    }
}
