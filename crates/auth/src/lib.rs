//! Authentication and authorization decisions, independent of transport and storage.

pub mod authorize;
pub mod claims;
pub mod policy;
pub mod principal;
pub mod token;

pub use authorize::{AuthorizationDecision, AuthzError, Ownership, authorize, explain};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use policy::{Access, Collection, Policy};
pub use principal::Principal;
pub use token::{Hs256JwtValidator, JwtValidator, TokenError};
