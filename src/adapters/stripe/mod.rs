//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe integration, including:
//! - Customer creation with a saved payment method
//! - Listing a customer's saved cards
//! - Off-session PaymentIntent confirmation
//!
//! # Security
//!
//! - The secret key is held in `secrecy::SecretString` and sent as basic auth
//! - Raw Stripe error bodies stay in server logs
//!
//! # Configuration
//!
//! Required environment variables:
//! - `SAVED_CARD__PAYMENT__STRIPE_SECRET_KEY`: Stripe secret API key
//! - `SAVED_CARD__PAYMENT__STRIPE_API_VERSION`: optional pinned API version

mod api_types;
mod mock_payment_provider;
mod stripe_adapter;

pub use api_types::{
    Expandable, StripeApiError, StripeCustomer, StripeErrorEnvelope, StripeList,
    StripePaymentIntent, StripePaymentMethod,
};
pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
