//! Server-side order pricing.
//!
//! The amount charged is always computed here and never taken from the client,
//! so a tampered request cannot change what the customer pays.

use serde::{Deserialize, Serialize};

/// Price of the demo order in minor currency units.
const ORDER_AMOUNT_MINOR_UNITS: i64 = 1400;

/// Currencies the checkout can charge in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usd,
}

impl Currency {
    /// ISO 4217 code in the lowercase form Stripe expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An amount in minor units (cents) paired with its currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAmount {
    /// Amount in the currency's smallest unit.
    pub minor_units: i64,

    /// Currency of the amount.
    pub currency: Currency,
}

impl OrderAmount {
    pub fn new(minor_units: i64, currency: Currency) -> Self {
        Self {
            minor_units,
            currency,
        }
    }
}

/// Computes the order total for a charge.
///
/// Replace the constant with a real calculation (cart lookup, tax, shipping).
/// It takes no client input on purpose.
pub fn calculate_order_amount() -> OrderAmount {
    OrderAmount::new(ORDER_AMOUNT_MINOR_UNITS, Currency::Usd)
}
