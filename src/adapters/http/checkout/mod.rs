//! HTTP adapter for checkout endpoints.
//!
//! Exposes the saved-card flow via REST API:
//! - `GET /` - Static checkout page
//! - `POST /charge-card-off-session` - Charge a saved card off-session
//! - `POST /webhook` - Handle Stripe webhooks

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{CheckoutApiError, CheckoutAppState, STRIPE_SIGNATURE_HEADER};
pub use routes::{checkout_router, checkout_routes, with_middleware, MAX_BODY_BYTES};
