//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SAVED_CARD` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use saved_card_charge::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod error;
mod payment;
mod server;

pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, static assets)
    #[serde(default)]
    pub server: ServerConfig,

    /// Payment configuration (Stripe)
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SAVED_CARD` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SAVED_CARD__SERVER__PORT=4242` -> `server.port = 4242`
    /// - `SAVED_CARD__PAYMENT__STRIPE_SECRET_KEY=...` -> `payment.stripe_secret_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SAVED_CARD")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.payment.validate(&self.server.environment)?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to set environment variables for testing
    /// Uses double underscores to separate nested config values
    fn set_minimal_env() {
        env::set_var("SAVED_CARD__PAYMENT__STRIPE_SECRET_KEY", "sk_test_xxx");
        env::set_var("SAVED_CARD__PAYMENT__STRIPE_PUBLISHABLE_KEY", "pk_test_xxx");
        env::set_var("SAVED_CARD__PAYMENT__STRIPE_WEBHOOK_SECRET", "whsec_xxx");
    }

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("SAVED_CARD__PAYMENT__STRIPE_SECRET_KEY");
        env::remove_var("SAVED_CARD__PAYMENT__STRIPE_PUBLISHABLE_KEY");
        env::remove_var("SAVED_CARD__PAYMENT__STRIPE_WEBHOOK_SECRET");
        env::remove_var("SAVED_CARD__PAYMENT__REQUIRE_SIGNATURE_VERIFICATION");
        env::remove_var("SAVED_CARD__PAYMENT__STRIPE_API_VERSION");
        env::remove_var("SAVED_CARD__SERVER__PORT");
        env::remove_var("SAVED_CARD__SERVER__ENVIRONMENT");
        env::remove_var("SAVED_CARD__SERVER__STATIC_DIR");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("SAVED_CARD__PAYMENT__STRIPE_API_VERSION", "2019-08-14");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.payment.stripe_secret_key, "sk_test_xxx");
        assert_eq!(config.payment.stripe_publishable_key, "pk_test_xxx");
        assert_eq!(config.payment.webhook_secret(), Some("whsec_xxx"));
        assert_eq!(config.payment.api_version(), Some("2019-08-14"));
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok());
        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 4242);
        assert_eq!(config.server.static_dir, "public");
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("SAVED_CARD__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_custom_server_settings() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("SAVED_CARD__SERVER__PORT", "3000");
        env::set_var("SAVED_CARD__SERVER__STATIC_DIR", "client/html");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.static_dir, "client/html");
    }

    #[test]
    fn test_signature_verification_can_be_disabled() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::remove_var("SAVED_CARD__PAYMENT__STRIPE_WEBHOOK_SECRET");
        env::set_var("SAVED_CARD__PAYMENT__REQUIRE_SIGNATURE_VERIFICATION", "false");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(!config.payment.require_signature_verification);
        assert!(config.payment.webhook_secret().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_payment_section_fails() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        assert!(AppConfig::load().is_err());
    }
}
