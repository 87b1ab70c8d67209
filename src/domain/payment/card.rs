//! Card details safe to show back to the customer.

use serde::{Deserialize, Serialize};

/// Non-sensitive card metadata (never the PAN).
///
/// Shown on the re-authentication screen so the customer recognises the card
/// being charged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSummary {
    /// Card brand (visa, mastercard, amex, ...).
    #[serde(default)]
    pub brand: String,

    /// Last four digits of the card number.
    #[serde(default)]
    pub last4: String,

    /// Expiry month (1-12).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp_month: Option<u32>,

    /// Four-digit expiry year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp_year: Option<u32>,

    /// Issuing country (ISO 3166-1 alpha-2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// credit, debit, prepaid or unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding: Option<String>,
}

impl CardSummary {
    pub fn new(brand: impl Into<String>, last4: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            last4: last4.into(),
            ..Default::default()
        }
    }
}
