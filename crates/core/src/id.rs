//! Strongly-typed document identifiers used across the domain.
//!
//! Records are addressed by opaque string ids (`cat1`, `prod7`, `seller3`, ...).
//! Every id type shares the same document-id rules, enforced on construction
//! and on deserialization.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Longest id accepted, in bytes.
pub const MAX_ID_LEN: usize = 1500;

/// Identifier of a category document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryId(String);

/// Identifier of a product document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

/// Identifier of an order document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderId(String);

/// Identifier of a cart document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CartId(String);

/// Identifier of a user (buyer, seller, or service identity).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

fn check_document_id(name: &str, s: &str) -> Result<(), DomainError> {
    if s.is_empty() {
        return Err(DomainError::invalid_id(format!("{name}: cannot be empty")));
    }
    if s.len() > MAX_ID_LEN {
        return Err(DomainError::invalid_id(format!(
            "{name}: longer than {MAX_ID_LEN} bytes"
        )));
    }
    if s.contains('/') {
        return Err(DomainError::invalid_id(format!("{name}: cannot contain '/'")));
    }
    if s == "." || s == ".." {
        return Err(DomainError::invalid_id(format!("{name}: '{s}' is reserved")));
    }
    if s.len() >= 4 && s.starts_with("__") && s.ends_with("__") {
        return Err(DomainError::invalid_id(format!("{name}: '{s}' is reserved")));
    }
    Ok(())
}

macro_rules! impl_document_id {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Generate a fresh identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7().simple().to_string())
            }

            pub fn parse(s: impl Into<String>) -> Result<Self, DomainError> {
                let s = s.into();
                check_document_id($name, &s)?;
                Ok(Self(s))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $t {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

impl_document_id!(CategoryId, "CategoryId");
impl_document_id!(ProductId, "ProductId");
impl_document_id!(OrderId, "OrderId");
impl_document_id!(CartId, "CartId");
impl_document_id!(UserId, "UserId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_seed_style_ids() {
        let id: CategoryId = "cat1".parse().unwrap();
        assert_eq!(id.as_str(), "cat1");
        assert_eq!(id.to_string(), "cat1");
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in ["", "a/b", ".", "..", "__meta__"] {
            let err = ProductId::parse(bad).unwrap_err();
            assert!(matches!(err, DomainError::InvalidId(_)), "{bad:?} -> {err:?}");
        }
        assert!(ProductId::parse("x".repeat(MAX_ID_LEN + 1)).is_err());
    }

    #[test]
    fn generated_ids_are_unique_and_valid() {
        let a = OrderId::new();
        let b = OrderId::new();
        assert_ne!(a, b);
        assert!(OrderId::parse(a.as_str()).is_ok());
    }

    #[test]
    fn deserialization_enforces_id_rules() {
        let ok: UserId = serde_json::from_str("\"seller1\"").unwrap();
        assert_eq!(ok.as_str(), "seller1");
        assert!(serde_json::from_str::<UserId>("\"users/seller1\"").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "\"seller1\"");
    }
}
