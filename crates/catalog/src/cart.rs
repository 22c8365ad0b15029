use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mercado_core::{CartId, DomainError, DomainResult, Entity, ProductId, UserId};

use crate::validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A user's shopping cart (owner-only collection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub items: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Cart {
    type Id = CartId;
    const KIND: &'static str = "cart";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCart {
    #[serde(default)]
    pub id: Option<CartId>,
    pub user_id: UserId,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Partial update of a cart; same ownership rule as [`crate::OrderPatch`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CartPatch {
    pub user_id: Option<UserId>,
    pub items: Option<Vec<CartItem>>,
}

impl Cart {
    pub fn create(data: NewCart, now: DateTime<Utc>) -> DomainResult<Self> {
        validate_items(&data.items)?;
        let (created_at, updated_at) = validate::creation_stamps(data.created_at, None, now)?;
        Ok(Self {
            id: data.id.unwrap_or_else(CartId::new),
            user_id: data.user_id,
            items: data.items,
            created_at,
            updated_at,
        })
    }

    /// Apply a patch, returning the updated record. `self` is not modified.
    pub fn patched(&self, patch: &CartPatch, now: DateTime<Utc>) -> DomainResult<Self> {
        let mut next = self.clone();
        if let Some(user_id) = &patch.user_id {
            next.user_id = user_id.clone();
        }
        if let Some(items) = &patch.items {
            validate_items(items)?;
            next.items = items.clone();
        }
        next.updated_at = validate::refreshed(self.updated_at, now);
        Ok(next)
    }

    /// Add `quantity` of a product, merging with an existing line.
    pub fn with_item_added(
        &self,
        product_id: ProductId,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("item quantity must be greater than zero"));
        }
        let mut next = self.clone();
        match next.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or_else(|| DomainError::validation("item quantity is out of range"))?;
            }
            None => next.items.push(CartItem { product_id, quantity }),
        }
        next.updated_at = validate::refreshed(self.updated_at, now);
        Ok(next)
    }

    /// Drop the line for a product. Removing an absent product is a no-op.
    pub fn with_item_removed(&self, product_id: &ProductId, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.items.retain(|i| &i.product_id != product_id);
        next.updated_at = validate::refreshed(self.updated_at, now);
        next
    }

    pub fn cleared(&self, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.items.clear();
        next.updated_at = validate::refreshed(self.updated_at, now);
        next
    }

    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.items
            .iter()
            .find(|i| &i.product_id == product_id)
            .map_or(0, |i| i.quantity)
    }
}

fn validate_items(items: &[CartItem]) -> DomainResult<()> {
    let mut seen = HashSet::new();
    for item in items {
        if item.quantity == 0 {
            return Err(DomainError::validation("item quantity must be greater than zero"));
        }
        if !seen.insert(&item.product_id) {
            return Err(DomainError::validation(format!(
                "product '{}' appears more than once",
                item.product_id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    fn empty_cart() -> Cart {
        Cart::create(
            NewCart {
                id: None,
                user_id: UserId::parse("buyer1").unwrap(),
                items: vec![],
                created_at: None,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn adding_merges_lines() {
        let cart = empty_cart()
            .with_item_added(pid("prod3"), 1, Utc::now())
            .unwrap()
            .with_item_added(pid("prod3"), 2, Utc::now())
            .unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.quantity_of(&pid("prod3")), 3);
    }

    #[test]
    fn removing_and_clearing() {
        let cart = empty_cart()
            .with_item_added(pid("prod3"), 1, Utc::now())
            .unwrap()
            .with_item_added(pid("prod8"), 1, Utc::now())
            .unwrap();

        let cart = cart.with_item_removed(&pid("prod3"), Utc::now());
        assert_eq!(cart.quantity_of(&pid("prod3")), 0);
        assert_eq!(cart.items.len(), 1);

        assert!(cart.cleared(Utc::now()).items.is_empty());
    }

    #[test]
    fn duplicate_lines_and_zero_quantities_are_rejected() {
        let patch = CartPatch {
            items: Some(vec![
                CartItem { product_id: pid("prod1"), quantity: 1 },
                CartItem { product_id: pid("prod1"), quantity: 2 },
            ]),
            ..CartPatch::default()
        };
        assert!(empty_cart().patched(&patch, Utc::now()).is_err());
        assert!(empty_cart().with_item_added(pid("prod1"), 0, Utc::now()).is_err());
    }
}
