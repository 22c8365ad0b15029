//! Owned collection: carts. Same ownership rule as orders.

use tracing::{info, instrument};

use mercado_auth::{Access, Collection, Ownership, Principal};
use mercado_catalog::{Cart, CartItem, CartPatch, NewCart, Product};
use mercado_core::{CartId, DomainError, Entity, ProductId, UserId};

use super::{CatalogStore, StoreError, authenticated, guard, list_owned, load_owned, now};

fn cart_owner(cart: &Cart) -> &UserId {
    &cart.user_id
}

impl CatalogStore {
    #[instrument(skip(self, data, principal), fields(user_id = %data.user_id), err)]
    pub fn create_cart(
        &self,
        data: NewCart,
        principal: Option<&Principal>,
    ) -> Result<Cart, StoreError> {
        guard(
            Collection::Carts,
            Access::Write,
            principal,
            Ownership::incoming(&data.user_id),
        )?;
        self.ensure_products_available(&data.items)?;

        let cart = self.carts.insert(Cart::create(data, now())?)?;
        info!(cart_id = %cart.id, "cart created");
        Ok(cart)
    }

    #[instrument(skip(self, principal), fields(cart_id = %id), err)]
    pub fn read_cart(
        &self,
        id: &CartId,
        principal: Option<&Principal>,
    ) -> Result<Cart, StoreError> {
        load_owned(self.carts.as_ref(), Collection::Carts, id, principal, cart_owner)
    }

    /// Update a cart; allowed when the caller owns the stored cart or is the
    /// `userId` carried by the patch.
    #[instrument(skip(self, patch, principal), fields(cart_id = %id), err)]
    pub fn update_cart(
        &self,
        id: &CartId,
        patch: &CartPatch,
        principal: Option<&Principal>,
    ) -> Result<Cart, StoreError> {
        authenticated(Collection::Carts, Access::Write, principal)?;

        // Product lookups run under the cart lock, after the owner check.
        let now = now();
        self.write_cart(id, principal, patch.user_id.as_ref(), &mut |c| {
            if let Some(items) = &patch.items {
                self.ensure_products_available(items)?;
            }
            Ok(c.patched(patch, now)?)
        })
    }

    #[instrument(skip(self, principal), fields(cart_id = %id, product_id = %product_id), err)]
    pub fn add_cart_item(
        &self,
        id: &CartId,
        product_id: &ProductId,
        quantity: u32,
        principal: Option<&Principal>,
    ) -> Result<Cart, StoreError> {
        authenticated(Collection::Carts, Access::Write, principal)?;

        let now = now();
        self.write_cart(id, principal, None, &mut |c| {
            self.available_product(product_id)?;
            Ok(c.with_item_added(product_id.clone(), quantity, now)?)
        })
    }

    pub fn remove_cart_item(
        &self,
        id: &CartId,
        product_id: &ProductId,
        principal: Option<&Principal>,
    ) -> Result<Cart, StoreError> {
        authenticated(Collection::Carts, Access::Write, principal)?;
        let now = now();
        self.write_cart(id, principal, None, &mut |c| Ok(c.with_item_removed(product_id, now)))
    }

    pub fn clear_cart(
        &self,
        id: &CartId,
        principal: Option<&Principal>,
    ) -> Result<Cart, StoreError> {
        authenticated(Collection::Carts, Access::Write, principal)?;
        let now = now();
        self.write_cart(id, principal, None, &mut |c| Ok(c.cleared(now)))
    }

    /// Carts owned by the principal, ordered by id.
    pub fn list_carts(&self, principal: Option<&Principal>) -> Result<Vec<Cart>, StoreError> {
        list_owned(self.carts.as_ref(), Collection::Carts, principal, cart_owner)
    }

    /// Owner check and cart rewrite under the cart's write lock.
    fn write_cart(
        &self,
        id: &CartId,
        principal: Option<&Principal>,
        incoming_owner: Option<&UserId>,
        f: &mut dyn FnMut(&Cart) -> Result<Cart, StoreError>,
    ) -> Result<Cart, StoreError> {
        let cart = self.carts.modify(id, &mut |c| {
            guard(
                Collection::Carts,
                Access::Write,
                principal,
                Ownership::update(&c.user_id, incoming_owner),
            )?;
            f(c)
        })?;
        info!(cart_id = %cart.id, lines = cart.items.len(), "cart updated");
        Ok(cart)
    }

    fn ensure_products_available(&self, items: &[CartItem]) -> Result<(), StoreError> {
        for item in items {
            self.available_product(&item.product_id)?;
        }
        Ok(())
    }

    /// Unknown products are a foreign-key error, inactive ones a validation error.
    fn available_product(&self, product_id: &ProductId) -> Result<(), StoreError> {
        let product = self
            .products
            .get(product_id)?
            .ok_or_else(|| DomainError::foreign_key(Product::KIND, product_id))?;
        if !product.is_listed() {
            return Err(
                DomainError::validation(format!("product '{product_id}' is not available")).into(),
            );
        }
        Ok(())
    }
}
