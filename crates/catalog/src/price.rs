use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use mercado_core::{DomainError, DomainResult, ValueObject};

/// Positive currency amount with two decimal places.
///
/// Stored as integer cents; serialized as a JSON number (`25.99`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price {
    cents: u64,
}

impl ValueObject for Price {}

impl Price {
    /// Largest accepted price (10,000,000.00). Up to it the decimal JSON form
    /// converts back to the same cents.
    pub const MAX_CENTS: u64 = 1_000_000_000;

    pub fn from_cents(cents: u64) -> DomainResult<Self> {
        if cents == 0 {
            return Err(DomainError::validation("price must be greater than zero"));
        }
        if cents > Self::MAX_CENTS {
            return Err(DomainError::validation("price is out of range"));
        }
        Ok(Self { cents })
    }

    /// Parse a decimal amount, rejecting more than two decimal places.
    pub fn from_decimal(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(DomainError::validation("price must be greater than zero"));
        }
        let scaled = amount * 100.0;
        let cents = scaled.round();
        if (scaled - cents).abs() > 1e-6 {
            return Err(DomainError::validation(
                "price must have at most two decimal places",
            ));
        }
        if cents > Self::MAX_CENTS as f64 {
            return Err(DomainError::validation("price is out of range"));
        }
        Self::from_cents(cents as u64)
    }

    pub fn cents(&self) -> u64 {
        self.cents
    }

    pub fn as_decimal(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Price multiplied by a quantity (line total); `None` on overflow.
    pub fn checked_times(&self, quantity: u32) -> Option<u64> {
        self.cents.checked_mul(u64::from(quantity))
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Price::from_decimal(amount).map_err(de::Error::custom)
    }
}
