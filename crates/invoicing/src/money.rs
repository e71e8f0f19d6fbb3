//! Monetary amounts: major-unit input and minor-unit (cents) storage.

use serde::{Deserialize, Serialize};

use invoicedesk_core::{DomainError, DomainResult, ValueObject};

use crate::schema::Violation;

/// Largest accepted major-unit amount.
///
/// Keeps `amount * 100` well inside the range where `f64` represents whole
/// cents exactly and the result fits an `i64`.
pub const MAX_MAJOR_AMOUNT: f64 = 10_000_000_000_000.0;

/// A validated, non-negative amount in major currency units (e.g. dollars).
///
/// Only produced by [`Amount::parse`], so every value is finite, non-negative
/// and within [`MAX_MAJOR_AMOUNT`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(f64);

impl Amount {
    /// Coerce raw form text into an amount.
    pub fn parse(raw: &str) -> Result<Self, Violation> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Violation::Empty);
        }

        let value: f64 = raw.parse().map_err(|_| Violation::NotANumber)?;
        if !value.is_finite() {
            return Err(Violation::NotANumber);
        }
        if value < 0.0 {
            return Err(Violation::Negative);
        }
        if value > MAX_MAJOR_AMOUNT {
            return Err(Violation::OutOfRange);
        }

        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Convert to minor units: `round(amount * 100)`, half away from zero.
    pub fn to_cents(self) -> AmountCents {
        AmountCents((self.0 * 100.0).round() as i64)
    }
}

/// Amount in the smallest currency unit (cents). Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct AmountCents(i64);

impl ValueObject for AmountCents {}

impl AmountCents {
    pub const ZERO: AmountCents = AmountCents(0);

    /// Wrap a stored minor-unit value, enforcing the non-negative invariant.
    pub fn new(cents: i64) -> DomainResult<Self> {
        if cents < 0 {
            return Err(DomainError::invariant(format!(
                "amount must be non-negative, got {cents} cents"
            )));
        }
        Ok(Self(cents))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for AmountCents {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AmountCents> for i64 {
    fn from(value: AmountCents) -> Self {
        value.0
    }
}

/// Renders as a major-unit decimal, e.g. `4500` cents as `45.00`.
impl core::fmt::Display for AmountCents {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_decimal_text() {
        let amount = Amount::parse("45.00").unwrap();
        assert_eq!(amount.to_cents().value(), 4500);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(Amount::parse("  12.5 ").unwrap().to_cents().value(), 1250);
    }

    #[test]
    fn rounds_binary_fraction_noise() {
        // 0.29 * 100 == 28.999999999999996 in f64
        assert_eq!(Amount::parse("0.29").unwrap().to_cents().value(), 29);
        assert_eq!(Amount::parse("1.005").unwrap().to_cents().value(), 100);
        assert_eq!(Amount::parse("10.125").unwrap().to_cents().value(), 1013);
    }

    #[test]
    fn rejects_non_numeric_text() {
        assert_eq!(Amount::parse("abc"), Err(Violation::NotANumber));
        assert_eq!(Amount::parse("12,50"), Err(Violation::NotANumber));
        assert_eq!(Amount::parse("NaN"), Err(Violation::NotANumber));
        assert_eq!(Amount::parse("inf"), Err(Violation::NotANumber));
    }

    #[test]
    fn rejects_blank_negative_and_huge_amounts() {
        assert_eq!(Amount::parse("   "), Err(Violation::Empty));
        assert_eq!(Amount::parse("-1"), Err(Violation::Negative));
        assert_eq!(Amount::parse("1e20"), Err(Violation::OutOfRange));
    }

    #[test]
    fn negative_zero_becomes_zero_cents() {
        assert_eq!(Amount::parse("-0").unwrap().to_cents(), AmountCents::ZERO);
    }

    #[test]
    fn stored_cents_must_be_non_negative() {
        assert!(AmountCents::new(0).is_ok());
        match AmountCents::new(-1).unwrap_err() {
            DomainError::InvariantViolation(msg) if msg.contains("non-negative") => {}
            other => panic!("expected invariant violation, got {other:?}"),
        }
    }

    #[test]
    fn displays_major_units() {
        assert_eq!(AmountCents::new(4500).unwrap().to_string(), "45.00");
        assert_eq!(AmountCents::new(7).unwrap().to_string(), "0.07");
        assert_eq!(AmountCents::new(123_456).unwrap().to_string(), "1234.56");
    }

    #[test]
    fn deserializing_negative_cents_fails() {
        assert!(serde_json::from_str::<AmountCents>("-5").is_err());
        assert_eq!(
            serde_json::from_str::<AmountCents>("5").unwrap(),
            AmountCents::new(5).unwrap()
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: any whole number of cents written as `major.minor` text
        /// converts back to exactly that many cents.
        #[test]
        fn decimal_text_converts_to_exact_cents(cents in 0i64..1_000_000_000_000i64) {
            let raw = format!("{}.{:02}", cents / 100, cents % 100);
            let amount = Amount::parse(&raw).unwrap();
            prop_assert_eq!(amount.to_cents().value(), cents);
        }

        /// Property: conversion equals `round(amount * 100)` and is never negative.
        #[test]
        fn cents_are_rounded_and_non_negative(value in 0.0f64..MAX_MAJOR_AMOUNT) {
            let amount = Amount::parse(&value.to_string()).unwrap();
            let cents = amount.to_cents().value();
            prop_assert!(cents >= 0);
            prop_assert_eq!(cents, (amount.value() * 100.0).round() as i64);
        }

        /// Property: negative inputs never validate.
        #[test]
        fn negative_amounts_are_rejected(value in -1.0e9f64..-0.001f64) {
            prop_assert_eq!(Amount::parse(&value.to_string()), Err(Violation::Negative));
        }
    }
}
