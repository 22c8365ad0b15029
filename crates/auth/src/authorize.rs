use serde::Serialize;
use thiserror::Error;

use mercado_core::UserId;

use crate::{Access, Collection, Policy, Principal};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("{access} on '{collection}' requires an authenticated principal")]
    Unauthenticated { collection: Collection, access: Access },

    #[error("{access} on '{collection}' is restricted to the owning user")]
    NotOwner { collection: Collection, access: Access },
}

/// Owner candidates for an owner-only check.
///
/// `stored` is the owner recorded on the existing record (if any), `incoming`
/// the owner carried by the payload being written (if any). Access is granted
/// when the principal matches either one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ownership<'a> {
    pub stored: Option<&'a UserId>,
    pub incoming: Option<&'a UserId>,
}

impl<'a> Ownership<'a> {
    /// No owner information (public collections).
    pub fn none() -> Self {
        Self::default()
    }

    /// Owner of an existing record.
    pub fn stored(owner: &'a UserId) -> Self {
        Self {
            stored: Some(owner),
            incoming: None,
        }
    }

    /// Owner carried by a new record being written.
    pub fn incoming(owner: &'a UserId) -> Self {
        Self {
            stored: None,
            incoming: Some(owner),
        }
    }

    /// Existing owner plus the (optional) owner in the write payload.
    pub fn update(stored: &'a UserId, incoming: Option<&'a UserId>) -> Self {
        Self {
            stored: Some(stored),
            incoming,
        }
    }

    fn matches(&self, principal: &Principal) -> bool {
        self.stored.is_some_and(|o| principal.is(o))
            || self.incoming.is_some_and(|o| principal.is(o))
    }
}

/// Auditable outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationDecision {
    pub collection: Collection,
    pub access: Access,
    pub granted: bool,
    pub reason: String,
    #[serde(skip)]
    pub denial: Option<AuthzError>,
}

/// Explain how the collection policy applies to this request.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn explain(
    collection: Collection,
    access: Access,
    principal: Option<&Principal>,
    ownership: Ownership<'_>,
) -> AuthorizationDecision {
    let (granted, reason, denial) = match (collection.policy(), access, principal) {
        (Policy::PublicRead, Access::Read, _) => {
            (true, format!("{collection} are publicly readable"), None)
        }
        (Policy::PublicRead, Access::Write, Some(p)) => (
            true,
            format!("authenticated principal '{}' may write {collection}", p.user_id),
            None,
        ),
        (_, _, None) => (
            false,
            format!("{access} on {collection} requires authentication"),
            Some(AuthzError::Unauthenticated { collection, access }),
        ),
        (Policy::OwnerOnly, _, Some(p)) if ownership.matches(p) => (
            true,
            format!("principal '{}' owns the {collection} record", p.user_id),
            None,
        ),
        (Policy::OwnerOnly, _, Some(p)) => (
            false,
            format!(
                "principal '{}' matches neither the stored owner ({}) nor the written owner ({})",
                p.user_id,
                display_owner(ownership.stored),
                display_owner(ownership.incoming),
            ),
            Some(AuthzError::NotOwner { collection, access }),
        ),
    };

    AuthorizationDecision {
        collection,
        access,
        granted,
        reason,
        denial,
    }
}

/// Authorize a request against the collection policy.
pub fn authorize(
    collection: Collection,
    access: Access,
    principal: Option<&Principal>,
    ownership: Ownership<'_>,
) -> Result<(), AuthzError> {
    match explain(collection, access, principal, ownership).denial {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn display_owner(owner: Option<&UserId>) -> String {
    owner.map_or_else(|| "none".to_string(), |o| format!("'{o}'"))
}
