use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mercado_core::{
    CategoryId, DomainError, DomainResult, Entity, ProductId, UserId, require_non_blank,
};

use crate::Price;
use crate::validate;

/// A product listed by a seller (public collection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: String,
    pub category_id: CategoryId,
    pub seller_id: UserId,
    pub seller_name: String,
    pub stock: u32,
    pub tags: BTreeSet<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Product {
    type Id = ProductId;
    const KIND: &'static str = "product";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn default_true() -> bool {
    true
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub image_url: String,
    pub category_id: CategoryId,
    pub seller_id: UserId,
    pub seller_name: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial update of a product. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
    pub seller_name: Option<String>,
    pub stock: Option<u32>,
    pub tags: Option<BTreeSet<String>>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

impl Product {
    /// Validate input and build a new product.
    ///
    /// The category reference is not resolved here; the store checks it.
    pub fn create(data: NewProduct, now: DateTime<Utc>) -> DomainResult<Self> {
        let (created_at, updated_at) =
            validate::creation_stamps(data.created_at, data.updated_at, now)?;
        let product = Self {
            id: data.id.unwrap_or_else(ProductId::new),
            name: data.name.trim().to_string(),
            description: data.description,
            price: data.price,
            image_url: data.image_url,
            category_id: data.category_id,
            seller_id: data.seller_id,
            seller_name: data.seller_name.trim().to_string(),
            stock: data.stock,
            tags: normalize_tags(data.tags),
            is_active: data.is_active,
            is_featured: data.is_featured,
            created_at,
            updated_at,
        };
        product.validate()?;
        Ok(product)
    }

    /// Apply a patch, returning the updated record. `self` is not modified.
    pub fn patched(&self, patch: &ProductPatch, now: DateTime<Utc>) -> DomainResult<Self> {
        let mut next = self.clone();
        if let Some(name) = &patch.name {
            next.name = name.trim().to_string();
        }
        if let Some(description) = &patch.description {
            next.description = description.clone();
        }
        if let Some(price) = patch.price {
            next.price = price;
        }
        if let Some(image_url) = &patch.image_url {
            next.image_url = image_url.clone();
        }
        if let Some(category_id) = &patch.category_id {
            next.category_id = category_id.clone();
        }
        if let Some(seller_name) = &patch.seller_name {
            next.seller_name = seller_name.trim().to_string();
        }
        if let Some(stock) = patch.stock {
            next.stock = stock;
        }
        if let Some(tags) = &patch.tags {
            next.tags = normalize_tags(tags.clone());
        }
        if let Some(is_active) = patch.is_active {
            next.is_active = is_active;
        }
        if let Some(is_featured) = patch.is_featured {
            next.is_featured = is_featured;
        }
        next.validate()?;
        next.updated_at = validate::refreshed(self.updated_at, now);
        Ok(next)
    }

    /// Apply a signed stock delta. Stock never goes negative.
    pub fn with_stock_adjusted(&self, delta: i64, now: DateTime<Utc>) -> DomainResult<Self> {
        if delta == 0 {
            return Err(DomainError::validation("delta cannot be zero"));
        }
        let new_stock = i64::from(self.stock) + delta;
        if new_stock < 0 {
            return Err(DomainError::validation(format!(
                "stock cannot go negative (stock={}, delta={delta})",
                self.stock
            )));
        }
        let stock = u32::try_from(new_stock)
            .map_err(|_| DomainError::validation("stock is out of range"))?;

        let mut next = self.clone();
        next.stock = stock;
        next.updated_at = validate::refreshed(self.updated_at, now);
        Ok(next)
    }

    /// Whether the product counts toward its category and can be ordered.
    pub fn is_listed(&self) -> bool {
        self.is_active
    }

    fn validate(&self) -> DomainResult<()> {
        require_non_blank("name", &self.name)?;
        require_non_blank("sellerName", &self.seller_name)?;
        validate::image_url("imageUrl", &self.image_url)?;
        if self.tags.iter().any(|t| t.is_empty()) {
            return Err(DomainError::validation("tags cannot contain blank entries"));
        }
        Ok(())
    }
}

fn normalize_tags(tags: BTreeSet<String>) -> BTreeSet<String> {
    tags.into_iter().map(|t| t.trim().to_string()).collect()
}
