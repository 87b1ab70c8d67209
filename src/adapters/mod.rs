//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `stripe` - Stripe REST client and an in-memory mock
//! - `http` - Axum routes serving the checkout page and API

pub mod http;
pub mod stripe;

pub use stripe::{MockPaymentProvider, StripeConfig, StripePaymentAdapter};
