//! Amount type
//!
//! Domain primitive for transfer amounts. Validated at construction time, so
//! a non-positive amount cannot reach the transfer processor.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// A strictly positive monetary amount.
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use ledger_engine::domain::Amount;
///
/// let amount: Amount = "12.34".parse().unwrap();
/// assert_eq!(amount.value(), Decimal::new(1234, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// # Errors
    /// `ValidationError::NonPositiveAmount` if value <= 0
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value <= Decimal::ZERO {
            return Err(ValidationError::non_positive(value));
        }
        Ok(Self(value))
    }

    pub fn from_integer(value: i64) -> Result<Self, ValidationError> {
        Self::new(Decimal::from(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// The signed leg amount: negative for the source account.
    pub fn negated(&self) -> Decimal {
        -self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Rejects input beyond 28 fractional digits instead of rounding it
        let decimal = Decimal::from_str_exact(trimmed).map_err(|e| ValidationError::InvalidAmount {
            input: s.to_string(),
            reason: e.to_string(),
        })?;

        if decimal <= Decimal::ZERO {
            // Keep the caller's spelling in the message ("-0.01", "0")
            return Err(ValidationError::non_positive(trimmed));
        }
        Ok(Self(decimal))
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl TryFrom<&str> for Amount {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_positive() {
        let amount = Amount::new(Decimal::new(100, 0)).unwrap();
        assert_eq!(amount.value(), Decimal::new(100, 0));
        assert_eq!(amount.negated(), Decimal::new(-100, 0));
    }

    #[test]
    fn test_amount_zero_rejected() {
        let err = Amount::new(Decimal::ZERO).unwrap_err();
        assert_eq!(err.to_string(), "Amount (0) must be positive");
    }

    #[test]
    fn test_amount_negative_text_preserved() {
        let err = "-0.01".parse::<Amount>().unwrap_err();
        assert_eq!(err.to_string(), "Amount (-0.01) must be positive");

        let err = "0".parse::<Amount>().unwrap_err();
        assert_eq!(err.to_string(), "Amount (0) must be positive");
    }

    #[test]
    fn test_amount_from_str() {
        let amount: Amount = "123.456".parse().unwrap();
        assert_eq!(amount.value(), Decimal::new(123456, 3));
        assert_eq!(amount.to_string(), "123.456");
    }

    #[test]
    fn test_amount_precision_is_never_rounded() {
        let tiny = "0.00000000000000000000000000001";
        let err = tiny.parse::<Amount>().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAmount { ref input, .. } if input == tiny));
        assert!(!err.to_string().contains("must be positive"));

        let long = "1.00000000000000000000000000009";
        let err = long.parse::<Amount>().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAmount { ref input, .. } if input == long));

        // the full 28 digits still parse as written
        let exact: Amount = "0.0000000000000000000000000001".parse().unwrap();
        assert_eq!(exact.to_string(), "0.0000000000000000000000000001");
    }

    #[test]
    fn test_amount_garbage_rejected() {
        let err = "twelve".parse::<Amount>().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAmount { .. }));
    }

    #[test]
    fn test_amount_deserialize_validates() {
        let ok: Amount = serde_json::from_str("\"5\"").unwrap();
        assert_eq!(ok.value(), Decimal::new(5, 0));

        let bad: Result<Amount, _> = serde_json::from_str("\"-5\"");
        assert!(bad.is_err());
    }
}
