//! Owned collection: orders.

use tracing::{info, instrument};

use mercado_auth::{Access, Collection, Ownership, Principal};
use mercado_catalog::{NewOrder, Order, OrderItem, OrderLine, OrderPatch, Product};
use mercado_core::{DomainError, Entity, OrderId, UserId};

use super::{CatalogStore, StoreError, authenticated, guard, list_owned, load_owned, now};

fn order_owner(order: &Order) -> &UserId {
    &order.user_id
}

impl CatalogStore {
    /// Place an order on behalf of `data.user_id`.
    ///
    /// Each line is priced from the current product record; unknown products
    /// are a foreign-key error and inactive ones a validation error.
    #[instrument(skip(self, data, principal), fields(user_id = %data.user_id), err)]
    pub fn create_order(
        &self,
        data: NewOrder,
        principal: Option<&Principal>,
    ) -> Result<Order, StoreError> {
        guard(
            Collection::Orders,
            Access::Write,
            principal,
            Ownership::incoming(&data.user_id),
        )?;

        let items = data
            .items
            .iter()
            .map(|line| self.price_line(line))
            .collect::<Result<Vec<_>, _>>()?;

        let order = Order::create(data.id, data.user_id, items, data.created_at, now())?;
        let total_cents = order.total_cents();
        let order = self.orders.insert(order)?;
        info!(order_id = %order.id, total_cents, "order created");
        Ok(order)
    }

    #[instrument(skip(self, principal), fields(order_id = %id), err)]
    pub fn read_order(
        &self,
        id: &OrderId,
        principal: Option<&Principal>,
    ) -> Result<Order, StoreError> {
        load_owned(self.orders.as_ref(), Collection::Orders, id, principal, order_owner)
    }

    /// Update an order. The write is allowed when the caller owns the stored
    /// order or is the `userId` carried by the patch.
    #[instrument(skip(self, patch, principal), fields(order_id = %id), err)]
    pub fn update_order(
        &self,
        id: &OrderId,
        patch: &OrderPatch,
        principal: Option<&Principal>,
    ) -> Result<Order, StoreError> {
        authenticated(Collection::Orders, Access::Write, principal)?;

        let now = now();
        let order = self.orders.modify(id, &mut |o| {
            guard(
                Collection::Orders,
                Access::Write,
                principal,
                Ownership::update(&o.user_id, patch.user_id.as_ref()),
            )?;
            Ok(o.patched(patch, now)?)
        })?;
        info!(status = ?order.status, "order updated");
        Ok(order)
    }

    /// Orders owned by the principal, ordered by id.
    pub fn list_orders(&self, principal: Option<&Principal>) -> Result<Vec<Order>, StoreError> {
        list_owned(self.orders.as_ref(), Collection::Orders, principal, order_owner)
    }

    fn price_line(&self, line: &OrderLine) -> Result<OrderItem, StoreError> {
        let product = self
            .products
            .get(&line.product_id)?
            .ok_or_else(|| DomainError::foreign_key(Product::KIND, &line.product_id))?;
        if !product.is_listed() {
            return Err(DomainError::validation(format!(
                "product '{}' is not available",
                product.id
            ))
            .into());
        }
        Ok(OrderItem {
            product_id: product.id,
            product_name: product.name,
            unit_price: product.price,
            quantity: line.quantity,
        })
    }
}
