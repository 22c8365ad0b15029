use serde::{Deserialize, Serialize};

use mercado_core::UserId;

use crate::JwtClaims;

/// An authenticated principal (buyer, seller, or service identity).
///
/// An unauthenticated caller is represented by the absence of a principal
/// (`Option<&Principal>::None`), never by a placeholder value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
}

impl Principal {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// True when this principal is the given user.
    pub fn is(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}

impl From<JwtClaims> for Principal {
    fn from(claims: JwtClaims) -> Self {
        Self::new(claims.sub)
    }
}
