//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the Stripe REST API with a
//! single shared `reqwest::Client`.
//!
//! # Security
//!
//! - The secret key is sent only as HTTP basic auth and held in `SecretString`
//! - Error bodies are logged server-side, never forwarded verbatim to clients
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(secret_key).with_api_version("2019-08-14");
//! let adapter = StripePaymentAdapter::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::config::PaymentConfig;
use crate::ports::{
    CreateCustomerRequest, CreatePaymentIntentRequest, Customer, PaymentError, PaymentIntent,
    PaymentMethod, PaymentProvider,
};

use super::api_types::{
    StripeCustomer, StripeErrorEnvelope, StripeList, StripePaymentIntent, StripePaymentMethod,
};

/// Default Stripe API endpoint.
const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Default timeout for a whole outbound request.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Upper bound on the TCP/TLS connect phase.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_..., sk_test_... or rk_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Pinned API version sent as `Stripe-Version`; account default if unset.
    api_version: Option<String>,

    /// Timeout applied to every outbound request.
    request_timeout: Duration,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Build from the application's payment configuration section.
    pub fn from_payment_config(payment: &PaymentConfig) -> Self {
        let mut config = Self::new(payment.stripe_secret_key.clone())
            .with_base_url(payment.api_base_url.clone())
            .with_request_timeout(Duration::from_secs(payment.request_timeout_secs));
        if let Some(version) = payment.api_version() {
            config = config.with_api_version(version);
        }
        config
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Pin the Stripe API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Override the outbound request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(config.request_timeout)
            .connect_timeout(
                config
                    .request_timeout
                    .min(Duration::from_secs(CONNECT_TIMEOUT_SECS)),
            )
            .build()
            .map_err(|e| PaymentError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    /// Start an authenticated request carrying the pinned API version.
    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder =
            builder.basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None);
        match &self.config.api_version {
            Some(version) => builder.header("Stripe-Version", version),
            None => builder,
        }
    }

    /// Send a request and decode either the object or Stripe's error body.
    async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> Result<T, PaymentError> {
        let response = self.authorized(builder).send().await.map_err(|e| {
            tracing::error!(operation, error = %e, timeout = e.is_timeout(), "Stripe request failed");
            if e.is_timeout() {
                PaymentError::network(format!("Stripe {} timed out", operation))
            } else {
                PaymentError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(self.map_error_body(status.as_u16(), &error_text, operation));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!(operation, error = %e, "Failed to parse Stripe response");
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })
    }

    fn map_error_body(&self, status: u16, body: &str, operation: &'static str) -> PaymentError {
        match serde_json::from_str::<StripeErrorEnvelope>(body) {
            Ok(envelope) => {
                let error = envelope.error.into_payment_error(status);
                if error.is_card_error() {
                    tracing::info!(
                        operation,
                        code = ?error.provider_code,
                        decline_code = ?error.decline_code,
                        "Stripe reported a card error"
                    );
                } else {
                    tracing::error!(operation, status, error = %body, "Stripe API error");
                }
                error
            }
            Err(_) => {
                tracing::error!(operation, status, error = %body, "Unrecognised Stripe error body");
                PaymentError::provider(format!("Stripe API error (HTTP {})", status))
            }
        }
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError> {
        let params = [("payment_method", request.payment_method_id.as_str())];

        let customer: StripeCustomer = self
            .execute(
                self.http_client.post(self.url("/v1/customers")).form(&params),
                "create_customer",
            )
            .await?;

        tracing::debug!(customer_id = %customer.id, "Stripe customer created");
        Ok(customer.into())
    }

    async fn list_card_payment_methods(
        &self,
        customer_id: &str,
    ) -> Result<Vec<PaymentMethod>, PaymentError> {
        let query = [("customer", customer_id), ("type", "card")];

        let list: StripeList<StripePaymentMethod> = self
            .execute(
                self.http_client
                    .get(self.url("/v1/payment_methods"))
                    .query(&query),
                "list_payment_methods",
            )
            .await?;

        Ok(list.data.into_iter().map(PaymentMethod::from).collect())
    }

    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        let params = vec![
            ("amount", request.amount.minor_units.to_string()),
            ("currency", request.amount.currency.as_str().to_string()),
            ("customer", request.customer_id.clone()),
            ("payment_method", request.payment_method_id.clone()),
            ("off_session", request.off_session.to_string()),
            ("confirm", request.confirm.to_string()),
        ];

        let intent: StripePaymentIntent = self
            .execute(
                self.http_client
                    .post(self.url("/v1/payment_intents"))
                    .form(&params),
                "create_payment_intent",
            )
            .await?;

        tracing::debug!(
            payment_intent_id = %intent.id,
            status = ?intent.status,
            "Stripe PaymentIntent created"
        );
        Ok(intent.into())
    }
}
