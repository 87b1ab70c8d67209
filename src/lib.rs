//! Saved Card Charge - Off-session card payments with Stripe
//!
//! This crate charges a customer's saved card while they are away, reports
//! back when the bank wants the customer to authenticate, and receives the
//! Stripe webhooks that follow.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
