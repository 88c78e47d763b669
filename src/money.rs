//! Money Module
//!
//! Minor-unit amounts tagged with an ISO 4217 currency code. Every amount that
//! crosses a partner boundary goes through this module.
//!
//! ## Internal Representation
//! - Amounts are `i64` minor units (centavos for PHP, cents for USD, yen for JPY)
//! - The scale factor is `10^exponent` of the currency
//! - Partner amounts arrive as decimal strings and are rounded exactly once,
//!   half away from zero, before being scaled
//!
//! ## Usage
//! ```rust
//! use remit_gateway::money::{Currency, Money};
//!
//! let principal = Money::parse("100.00", Currency::PHP).unwrap();
//! assert_eq!(principal.minor(), 10_000);
//!
//! let fee = Money::from_minor(1_500, Currency::PHP);
//! let total = principal.checked_add(fee).unwrap();
//! assert_eq!(total.to_string(), "115.00 PHP");
//! ```

use rust_decimal::RoundingStrategy;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The single rounding mode used for every decimal → minor-unit conversion.
pub const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

// ============================================================================
// Error Types
// ============================================================================

/// Money conversion errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: Currency, right: Currency },

    #[error("Invalid amount format: {0}")]
    InvalidFormat(String),

    #[error("Amount too large, would overflow")]
    Overflow,
}

// ============================================================================
// Currency
// ============================================================================

/// ISO 4217 alphabetic currency code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency([u8; 3]);

impl Currency {
    pub const PHP: Currency = Currency(*b"PHP");
    pub const USD: Currency = Currency(*b"USD");
    pub const JPY: Currency = Currency(*b"JPY");
    pub const EUR: Currency = Currency(*b"EUR");

    /// Parse a currency code (case-insensitive, surrounding whitespace ignored)
    pub fn new(code: &str) -> Result<Self, MoneyError> {
        let code = code.trim();
        let bytes = code.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(MoneyError::InvalidCurrency(code.to_string()));
        }
        let mut out = [0u8; 3];
        for (dst, src) in out.iter_mut().zip(bytes) {
            *dst = src.to_ascii_uppercase();
        }
        Ok(Self(out))
    }

    pub fn as_str(&self) -> &str {
        // Constructed only from validated ASCII
        std::str::from_utf8(&self.0).unwrap_or("XXX")
    }

    /// Number of decimal places in the minor unit
    pub fn minor_exponent(&self) -> u32 {
        match self.as_str() {
            "JPY" | "KRW" | "VND" | "CLP" | "ISK" | "XAF" | "XOF" | "UGX" => 0,
            "BHD" | "KWD" | "OMR" | "JOD" | "TND" | "LYD" | "IQD" => 3,
            _ => 2,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Currency {
    type Error = MoneyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Currency::new(&value)
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.as_str().to_string()
    }
}

impl std::str::FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::new(s)
    }
}

// ============================================================================
// Money
// ============================================================================

/// An amount in minor units of a single currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    minor: i64,
    currency: Currency,
}

impl Money {
    pub const fn from_minor(minor: i64, currency: Currency) -> Self {
        Self { minor, currency }
    }

    pub const fn zero(currency: Currency) -> Self {
        Self::from_minor(0, currency)
    }

    #[inline]
    pub fn minor(&self) -> i64 {
        self.minor
    }

    #[inline]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.minor == 0
    }

    /// Convert a decimal major-unit amount into minor units
    ///
    /// The value is rounded once to the currency exponent with [`ROUNDING`],
    /// then scaled. No other rounding happens on this path.
    pub fn from_decimal(amount: Decimal, currency: Currency) -> Result<Self, MoneyError> {
        let exponent = currency.minor_exponent();
        let rounded = amount.round_dp_with_strategy(exponent, ROUNDING);
        let scale = Decimal::from(10i64.pow(exponent));
        let minor = rounded
            .checked_mul(scale)
            .and_then(|v| v.to_i64())
            .ok_or(MoneyError::Overflow)?;
        Ok(Self { minor, currency })
    }

    /// Parse a partner-supplied decimal string such as `"1,250.50"`
    pub fn parse(amount: &str, currency: Currency) -> Result<Self, MoneyError> {
        let cleaned: String = amount.trim().chars().filter(|c| *c != ',').collect();
        if cleaned.is_empty() {
            return Err(MoneyError::InvalidFormat("empty string".into()));
        }
        let decimal = Decimal::from_str(&cleaned)
            .map_err(|_| MoneyError::InvalidFormat(amount.to_string()))?;
        Self::from_decimal(decimal, currency)
    }

    /// Major-unit decimal view (exact, no rounding)
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.minor, self.currency.minor_exponent())
    }

    /// Add two amounts of the same currency
    pub fn checked_add(self, other: Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            });
        }
        let minor = self
            .minor
            .checked_add(other.minor)
            .ok_or(MoneyError::Overflow)?;
        Ok(Self::from_minor(minor, self.currency))
    }

    /// Sum a non-empty set of same-currency amounts
    pub fn sum<I>(first: Money, rest: I) -> Result<Money, MoneyError>
    where
        I: IntoIterator<Item = Money>,
    {
        rest.into_iter().try_fold(first, Money::checked_add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.prec$} {}",
            self.to_decimal(),
            self.currency,
            prec = self.currency.minor_exponent() as usize
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_parse() {
        assert_eq!(Currency::new("php").unwrap(), Currency::PHP);
        assert_eq!(Currency::new(" USD ").unwrap(), Currency::USD);
        assert!(Currency::new("PH").is_err());
        assert!(Currency::new("P1P").is_err());
        assert_eq!(Currency::JPY.minor_exponent(), 0);
        assert_eq!(Currency::new("KWD").unwrap().minor_exponent(), 3);
        assert_eq!(Currency::PHP.minor_exponent(), 2);
    }

    #[test]
    fn test_parse_partner_amounts() {
        assert_eq!(Money::parse("100.00", Currency::PHP).unwrap().minor(), 10_000);
        assert_eq!(Money::parse("1,250.5", Currency::PHP).unwrap().minor(), 125_050);
        assert_eq!(Money::parse("1500", Currency::JPY).unwrap().minor(), 1_500);
        assert!(Money::parse("", Currency::PHP).is_err());
        assert!(Money::parse("abc", Currency::PHP).is_err());
    }

    #[test]
    fn test_rounding_applied_once() {
        // Half away from zero at the currency exponent
        assert_eq!(Money::parse("100.005", Currency::PHP).unwrap().minor(), 10_001);
        assert_eq!(Money::parse("-100.005", Currency::PHP).unwrap().minor(), -10_001);
        // A second rounding pass (100.0049 -> 100.005 -> 100.01) would give 10_001
        assert_eq!(Money::parse("100.0049", Currency::PHP).unwrap().minor(), 10_000);
        assert_eq!(Money::parse("99.5", Currency::JPY).unwrap().minor(), 100);
    }

    #[test]
    fn test_minor_roundtrip() {
        let currencies = [Currency::PHP, Currency::USD, Currency::JPY, Currency::new("BHD").unwrap()];
        let values = [0i64, 1, 5, 99, 100, 10_000, 123_456_789, -42, i64::MAX / 1_000];
        for currency in currencies {
            for minor in values {
                let money = Money::from_minor(minor, currency);
                let back = Money::from_decimal(money.to_decimal(), currency).unwrap();
                assert_eq!(back, money, "roundtrip failed for {} {}", minor, currency);
            }
        }
    }

    #[test]
    fn test_checked_add() {
        let a = Money::from_minor(10_000, Currency::PHP);
        let b = Money::from_minor(250, Currency::PHP);
        assert_eq!(a.checked_add(b).unwrap().minor(), 10_250);

        let usd = Money::from_minor(1, Currency::USD);
        assert!(matches!(
            a.checked_add(usd),
            Err(MoneyError::CurrencyMismatch { .. })
        ));

        let max = Money::from_minor(i64::MAX, Currency::PHP);
        assert_eq!(max.checked_add(b), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_sum_and_display() {
        let total = Money::sum(
            Money::from_minor(10_000, Currency::PHP),
            [Money::from_minor(1_500, Currency::PHP), Money::from_minor(180, Currency::PHP)],
        )
        .unwrap();
        assert_eq!(total.to_string(), "116.80 PHP");
        assert_eq!(Money::from_minor(1_500, Currency::JPY).to_string(), "1500 JPY");
    }

    #[test]
    fn test_serde_shape() {
        let money = Money::from_minor(10_000, Currency::PHP);
        let json = serde_json::to_value(money).unwrap();
        assert_eq!(json, serde_json::json!({"minor": 10000, "currency": "PHP"}));
        let back: Money = serde_json::from_value(json).unwrap();
        assert_eq!(back, money);
        assert!(serde_json::from_str::<Currency>("\"XX\"").is_err());
    }
}
