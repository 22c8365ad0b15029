//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// dangling references, conflicts). Authorization lives in `mercado-auth`
/// and storage failures belong to the infra layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed or missing field).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. empty or containing a `/`).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A reference to another record does not resolve.
    #[error("{entity} '{id}' does not exist")]
    ForeignKey { entity: &'static str, id: String },

    /// A requested record was not found.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// A conflict occurred (e.g. the id is already taken).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn foreign_key(entity: &'static str, id: impl core::fmt::Display) -> Self {
        Self::ForeignKey {
            entity,
            id: id.to_string(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl core::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

/// Reject blank strings for a required field.
pub fn require_non_blank(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_key_message_names_entity_and_id() {
        let err = DomainError::foreign_key("category", "cat99");
        assert_eq!(err.to_string(), "category 'cat99' does not exist");
    }

    #[test]
    fn require_non_blank_rejects_whitespace() {
        assert!(require_non_blank("name", "Miel").is_ok());
        match require_non_blank("name", "   ") {
            Err(DomainError::Validation(msg)) => assert_eq!(msg, "name cannot be empty"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
