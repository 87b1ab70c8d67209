//! Payment configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    pub stripe_secret_key: String,

    /// Stripe publishable key, handed to the browser
    pub stripe_publishable_key: String,

    /// Pinned Stripe API version
    pub stripe_api_version: Option<String>,

    /// Stripe webhook signing secret
    pub stripe_webhook_secret: Option<String>,

    /// Refuse to start without a webhook signing secret
    #[serde(default = "default_require_signature_verification")]
    pub require_signature_verification: bool,

    /// Stripe API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Outbound request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_secret_key: String::new(),
            stripe_publishable_key: String::new(),
            stripe_api_version: None,
            stripe_webhook_secret: None,
            require_signature_verification: default_require_signature_verification(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_require_signature_verification() -> bool {
    true
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_secret_key.starts_with("sk_test_") || self.stripe_secret_key.starts_with("rk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_secret_key.starts_with("sk_live_") || self.stripe_secret_key.starts_with("rk_live_")
    }

    /// Webhook signing secret, if one is set
    pub fn webhook_secret(&self) -> Option<&str> {
        self.stripe_webhook_secret
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Pinned API version, if one is set
    pub fn api_version(&self) -> Option<&str> {
        self.stripe_api_version
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Validate payment configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.stripe_secret_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_SECRET_KEY"));
        }
        if self.stripe_publishable_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_PUBLISHABLE_KEY"));
        }

        // Verify key prefixes for safety
        if !(self.stripe_secret_key.starts_with("sk_") || self.stripe_secret_key.starts_with("rk_"))
        {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !self.stripe_publishable_key.starts_with("pk_") {
            return Err(ValidationError::InvalidPublishableKey);
        }
        let publishable_test = self.stripe_publishable_key.starts_with("pk_test_");
        let publishable_live = self.stripe_publishable_key.starts_with("pk_live_");
        if (self.is_test_mode() && publishable_live) || (self.is_live_mode() && publishable_test) {
            return Err(ValidationError::KeyModeMismatch);
        }

        match self.webhook_secret() {
            Some(secret) if !secret.starts_with("whsec_") => {
                return Err(ValidationError::InvalidStripeWebhookSecret);
            }
            Some(_) => {}
            None if self.require_signature_verification => {
                return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
            }
            None if *environment == Environment::Production => {
                return Err(ValidationError::UnsignedWebhooksInProduction);
            }
            None => {}
        }

        if !(self.api_base_url.starts_with("https://") || self.api_base_url.starts_with("http://")) {
            return Err(ValidationError::InvalidApiBaseUrl);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }

        Ok(())
    }
}
