//! Raw numeric input as entered by the user.
//!
//! Prices, percentages and bill-level amounts reach the engine as text typed
//! into a form or read off a receipt. [`RawAmount`] keeps that text untouched
//! so the engine can apply a single parse-or-default policy to it later.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A numeric field exactly as it was supplied.
///
/// Deserializes from either a JSON string (`"12.50"`, `"$12.50"`) or a JSON
/// number (`12.5`) and always serializes back as a string.
///
/// # Example
///
/// ```
/// use bill_split_engine::models::RawAmount;
///
/// let from_text: RawAmount = serde_json::from_str("\"$12.50\"").unwrap();
/// let from_number: RawAmount = serde_json::from_str("12.5").unwrap();
///
/// assert_eq!(from_text.as_str(), "$12.50");
/// assert_eq!(from_number.as_str(), "12.5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawAmountRepr", into = "String")]
pub struct RawAmount(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmountRepr {
    Text(String),
    Number(serde_json::Number),
    Null(()),
}

impl From<RawAmountRepr> for RawAmount {
    fn from(repr: RawAmountRepr) -> Self {
        match repr {
            RawAmountRepr::Text(text) => RawAmount(text),
            RawAmountRepr::Number(number) => RawAmount(number.to_string()),
            RawAmountRepr::Null(()) => RawAmount(String::new()),
        }
    }
}

impl From<RawAmount> for String {
    fn from(raw: RawAmount) -> Self {
        raw.0
    }
}

impl RawAmount {
    /// Creates a raw amount from any text.
    pub fn new(text: impl Into<String>) -> Self {
        RawAmount(text.into())
    }

    /// The literal zero used for adjustments the user never filled in.
    pub fn zero() -> Self {
        RawAmount("0.00".to_string())
    }

    /// Returns the original text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RawAmount {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for RawAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RawAmount {
    fn from(text: &str) -> Self {
        RawAmount::new(text)
    }
}

impl From<String> for RawAmount {
    fn from(text: String) -> Self {
        RawAmount(text)
    }
}
