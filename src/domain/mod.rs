//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `payment` - Order pricing, off-session charge outcomes, and webhook events
pub mod payment;
