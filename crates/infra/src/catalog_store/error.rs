use thiserror::Error;

use mercado_auth::AuthzError;
use mercado_core::DomainError;

/// Error surfaced by every `CatalogStore` operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Malformed or missing field.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced record (category, product) does not exist.
    #[error("{entity} '{id}' does not exist")]
    ForeignKey { entity: &'static str, id: String },

    /// Unknown id.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// The principal lacks permission.
    #[error(transparent)]
    Authorization(#[from] AuthzError),

    /// The id is already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The storage backend failed (e.g. poisoned lock).
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    /// Stable name of the error kind, for logs and callers mapping to their own codes.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Validation(_) => "validation_error",
            StoreError::ForeignKey { .. } => "foreign_key_error",
            StoreError::NotFound { .. } => "not_found",
            StoreError::Authorization(_) => "authorization_error",
            StoreError::Conflict(_) => "conflict",
            StoreError::Backend(_) => "backend_error",
        }
    }
}

impl From<DomainError> for StoreError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => StoreError::Validation(msg),
            DomainError::InvalidId(msg) => StoreError::Validation(msg),
            DomainError::ForeignKey { entity, id } => StoreError::ForeignKey { entity, id },
            DomainError::NotFound { entity, id } => StoreError::NotFound { entity, id },
            DomainError::Conflict(msg) => StoreError::Conflict(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mercado_auth::{Access, Collection};

    #[test]
    fn domain_errors_map_to_store_kinds() {
        assert_eq!(StoreError::from(DomainError::validation("x")).kind(), "validation_error");
        assert_eq!(StoreError::from(DomainError::invalid_id("x")).kind(), "validation_error");
        assert_eq!(
            StoreError::from(DomainError::foreign_key("category", "cat99")).kind(),
            "foreign_key_error"
        );
        assert_eq!(StoreError::from(DomainError::not_found("order", "o1")).kind(), "not_found");
    }

    #[test]
    fn authorization_errors_keep_their_message() {
        let err = StoreError::from(AuthzError::Unauthenticated {
            collection: Collection::Products,
            access: Access::Write,
        });
        assert_eq!(err.kind(), "authorization_error");
        assert_eq!(err.to_string(), "write on 'products' requires an authenticated principal");
    }
}
