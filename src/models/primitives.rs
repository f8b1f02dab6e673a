//! Newtypes for identifiers that should not be mixed up at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A strongly-typed account id (e.g. `"tfsa-hy3kqwmb"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account id from a string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the account id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A strongly-typed order id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Create a new order id.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the order id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A monetary value with its currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    /// The amount
    pub amount: rust_decimal::Decimal,
    /// ISO currency code (e.g. `"CAD"`)
    #[serde(default)]
    pub currency: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_account_id() {
        let id = AccountId::new("tfsa-hy3kqwmb");
        assert_eq!(id.as_str(), "tfsa-hy3kqwmb");
        assert_eq!(id.to_string(), "tfsa-hy3kqwmb");
    }

    #[test]
    fn test_money_deserializes_string_amounts() {
        let money: Money = serde_json::from_str(r#"{"amount":"12.25","currency":"CAD"}"#).unwrap();
        assert_eq!(money.amount, dec!(12.25));
        assert_eq!(money.currency.as_deref(), Some("CAD"));
    }
}
