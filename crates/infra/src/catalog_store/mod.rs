//! Catalog data-access and authorization service.
//!
//! `CatalogStore` is the single entry point for reading and writing marketplace
//! records. Every operation follows the same pipeline:
//!
//! ```text
//! request (+ optional principal)
//!   ↓
//! 1. Authorize against the collection policy (public-read / owner-only)
//!   ↓
//! 2. Validate input and resolve references (category, products)
//!   ↓
//! 3. Apply the write atomically on one record (RecordStore::modify / insert)
//!   ↓
//! 4. Refresh derived data (category product counts)
//! ```
//!
//! ## Ownership checks
//!
//! For owned collections the stored owner is checked inside the record's
//! write lock, so ownership cannot change between the check and the write.
//!
//! ## Derived counts
//!
//! `Category::product_count` is recomputed after every product write, inside
//! the category's write lock. The last recompute to run always observes every
//! product write that preceded it, so counts converge. Lock order is
//! categories → products and carts → products; no code path holds a product
//! lock while taking another collection's lock.
//!
//! Categories and products are never hard-deleted, so a foreign key that
//! resolved once keeps resolving.

mod carts;
mod catalog;
mod error;
mod orders;
mod users;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use mercado_auth::{Access, AuthzError, Collection, Ownership, Principal, explain};
use mercado_catalog::{Cart, Category, Order, Product, UserProfile};
use mercado_core::{DomainError, Entity, UserId};

use crate::read_model::{InMemoryRecordStore, RecordStore};

pub use error::StoreError;

/// Storage backends for each collection.
pub struct Backends {
    pub categories: Arc<dyn RecordStore<Category>>,
    pub products: Arc<dyn RecordStore<Product>>,
    pub orders: Arc<dyn RecordStore<Order>>,
    pub carts: Arc<dyn RecordStore<Cart>>,
    pub users: Arc<dyn RecordStore<UserProfile>>,
}

impl Backends {
    pub fn in_memory() -> Self {
        Self {
            categories: Arc::new(InMemoryRecordStore::new()),
            products: Arc::new(InMemoryRecordStore::new()),
            orders: Arc::new(InMemoryRecordStore::new()),
            carts: Arc::new(InMemoryRecordStore::new()),
            users: Arc::new(InMemoryRecordStore::new()),
        }
    }
}

/// Guards and persists categories, products, orders, carts, and user profiles.
pub struct CatalogStore {
    categories: Arc<dyn RecordStore<Category>>,
    products: Arc<dyn RecordStore<Product>>,
    orders: Arc<dyn RecordStore<Order>>,
    carts: Arc<dyn RecordStore<Cart>>,
    users: Arc<dyn RecordStore<UserProfile>>,
}

impl core::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CatalogStore").finish_non_exhaustive()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl CatalogStore {
    pub fn new(backends: Backends) -> Self {
        Self {
            categories: backends.categories,
            products: backends.products,
            orders: backends.orders,
            carts: backends.carts,
            users: backends.users,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Backends::in_memory())
    }
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Check the collection policy, logging denials with their reason.
fn guard(
    collection: Collection,
    access: Access,
    principal: Option<&Principal>,
    ownership: Ownership<'_>,
) -> Result<(), StoreError> {
    let decision = explain(collection, access, principal, ownership);
    match decision.denial {
        None => Ok(()),
        Some(err) => {
            warn!(
                collection = %collection,
                access = %access,
                reason = %decision.reason,
                "authorization denied"
            );
            Err(err.into())
        }
    }
}

/// Require an authenticated principal before touching an owned collection.
fn authenticated<'p>(
    collection: Collection,
    access: Access,
    principal: Option<&'p Principal>,
) -> Result<&'p Principal, StoreError> {
    match principal {
        Some(p) => Ok(p),
        None => {
            warn!(
                collection = %collection,
                access = %access,
                "authorization denied: no principal"
            );
            Err(AuthzError::Unauthenticated { collection, access }.into())
        }
    }
}

fn not_found<V: Entity>(id: &V::Id) -> StoreError {
    DomainError::not_found(V::KIND, id).into()
}

/// Load an owned record and check the caller owns it.
///
/// Unauthenticated callers are rejected before the lookup; authenticated
/// callers get `NotFound` for absent ids.
fn load_owned<V: Entity>(
    store: &dyn RecordStore<V>,
    collection: Collection,
    id: &V::Id,
    principal: Option<&Principal>,
    owner: fn(&V) -> &UserId,
) -> Result<V, StoreError> {
    let principal = authenticated(collection, Access::Read, principal)?;
    let record = store.get(id)?.ok_or_else(|| not_found::<V>(id))?;
    guard(
        collection,
        Access::Read,
        Some(principal),
        Ownership::stored(owner(&record)),
    )?;
    Ok(record)
}

/// Records of an owned collection that belong to the principal.
fn list_owned<V: Entity>(
    store: &dyn RecordStore<V>,
    collection: Collection,
    principal: Option<&Principal>,
    owner: fn(&V) -> &UserId,
) -> Result<Vec<V>, StoreError> {
    let principal = authenticated(collection, Access::Read, principal)?;
    Ok(store
        .list()?
        .into_iter()
        .filter(|r| principal.is(owner(r)))
        .collect())
}
