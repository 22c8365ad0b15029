use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mercado_core::{DomainError, DomainResult, Entity, OrderId, ProductId, UserId};

use crate::Price;
use crate::validate;

/// Order status lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether `self -> next` is a legal move. Staying put is always legal.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        self == next
            || matches!(
                (self, next),
                (Pending, Confirmed)
                    | (Pending, Cancelled)
                    | (Confirmed, Shipped)
                    | (Confirmed, Cancelled)
                    | (Shipped, Delivered)
            )
    }
}

/// A line of an order, priced when the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Price,
    pub quantity: u32,
}

impl OrderItem {
    /// Line total in cents; `None` when it does not fit a `u64`.
    pub fn checked_total_cents(&self) -> Option<u64> {
        self.unit_price.checked_times(self.quantity)
    }
}

/// A requested line of a new order; the store resolves name and price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// An order placed by a user (owner-only collection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Order {
    type Id = OrderId;
    const KIND: &'static str = "order";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Input for placing an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    #[serde(default)]
    pub id: Option<OrderId>,
    pub user_id: UserId,
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Partial update of an order.
///
/// `userId` participates in the ownership check: a write is allowed when the
/// caller owns the stored order or is the `userId` being written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderPatch {
    pub user_id: Option<UserId>,
    pub status: Option<OrderStatus>,
}

impl Order {
    /// Build a new pending order from resolved line items.
    pub fn create(
        id: Option<OrderId>,
        user_id: UserId,
        items: Vec<OrderItem>,
        created_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if items.is_empty() {
            return Err(DomainError::validation("an order needs at least one item"));
        }
        if items.iter().any(|i| i.quantity == 0) {
            return Err(DomainError::validation("item quantity must be greater than zero"));
        }
        if checked_total(&items).is_none() {
            return Err(DomainError::validation("order total is out of range"));
        }
        let (created_at, updated_at) = validate::creation_stamps(created_at, None, now)?;
        Ok(Self {
            id: id.unwrap_or_else(OrderId::new),
            user_id,
            items,
            status: OrderStatus::Pending,
            created_at,
            updated_at,
        })
    }

    /// Apply a patch, returning the updated record. `self` is not modified.
    pub fn patched(&self, patch: &OrderPatch, now: DateTime<Utc>) -> DomainResult<Self> {
        let mut next = self.clone();
        if let Some(user_id) = &patch.user_id {
            next.user_id = user_id.clone();
        }
        if let Some(status) = patch.status {
            if !self.status.can_transition_to(status) {
                return Err(DomainError::validation(format!(
                    "order cannot move from {:?} to {:?}",
                    self.status, status
                )));
            }
            next.status = status;
        }
        next.updated_at = validate::refreshed(self.updated_at, now);
        Ok(next)
    }

    /// Order total in cents. Creation rejects orders whose total overflows.
    pub fn total_cents(&self) -> u64 {
        checked_total(&self.items).unwrap_or(u64::MAX)
    }
}

fn checked_total(items: &[OrderItem]) -> Option<u64> {
    items
        .iter()
        .try_fold(0u64, |acc, item| acc.checked_add(item.checked_total_cents()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product: &str, cents: u64, quantity: u32) -> OrderItem {
        OrderItem {
            product_id: ProductId::parse(product).unwrap(),
            product_name: "Café Orgánico de Altura".to_string(),
            unit_price: Price::from_cents(cents).unwrap(),
            quantity,
        }
    }

    fn order() -> Order {
        Order::create(
            None,
            UserId::parse("buyer1").unwrap(),
            vec![item("prod6", 3200, 2), item("prod7", 1525, 1)],
            None,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn new_orders_are_pending_and_totalled() {
        let order = order();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_cents(), 3200 * 2 + 1525);
    }

    #[test]
    fn empty_orders_and_zero_quantities_are_rejected() {
        let user = UserId::parse("buyer1").unwrap();
        assert!(Order::create(None, user.clone(), vec![], None, Utc::now()).is_err());
        assert!(Order::create(None, user, vec![item("prod6", 3200, 0)], None, Utc::now()).is_err());
    }

    #[test]
    fn overflowing_totals_are_rejected() {
        let user = UserId::parse("buyer1").unwrap();
        let line = item("prod1", Price::MAX_CENTS, u32::MAX);
        assert!(line.checked_total_cents().is_some());

        // Each line fits on its own; the sum does not.
        let lines = vec![line; 5];
        assert!(matches!(
            Order::create(None, user, lines, None, Utc::now()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn status_lifecycle() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Shipped));
        assert!(Shipped.can_transition_to(Delivered));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Delivered.can_transition_to(Delivered));
        assert!(!Shipped.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Confirmed));
    }

    #[test]
    fn patch_rejects_illegal_transition() {
        let order = order();
        let patch = OrderPatch {
            status: Some(OrderStatus::Delivered),
            ..OrderPatch::default()
        };
        assert!(matches!(order.patched(&patch, Utc::now()), Err(DomainError::Validation(_))));
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&OrderStatus::Shipped).unwrap(), "\"shipped\"");
    }
}
