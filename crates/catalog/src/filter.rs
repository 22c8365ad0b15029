use serde::{Deserialize, Serialize};

use mercado_core::{CategoryId, UserId};

use crate::{Price, Product};

/// Criteria for `list_products`. An empty filter lists every active product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductFilter {
    pub category_id: Option<CategoryId>,
    pub seller_id: Option<UserId>,
    pub tag: Option<String>,
    pub featured_only: bool,
    pub in_stock_only: bool,
    pub include_inactive: bool,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
}

impl ProductFilter {
    pub fn in_category(category_id: CategoryId) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        if !self.include_inactive && !product.is_active {
            return false;
        }
        if self.featured_only && !product.is_featured {
            return false;
        }
        if self.in_stock_only && product.stock == 0 {
            return false;
        }
        if self.category_id.as_ref().is_some_and(|c| c != &product.category_id) {
            return false;
        }
        if self.seller_id.as_ref().is_some_and(|s| s != &product.seller_id) {
            return false;
        }
        if self.tag.as_ref().is_some_and(|t| !product.tags.contains(t)) {
            return false;
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::NewProduct;

    fn product(category: &str, cents: u64, featured: bool, active: bool) -> Product {
        Product::create(
            NewProduct {
                id: None,
                name: "Hamaca Artesanal".to_string(),
                description: String::new(),
                price: Price::from_cents(cents).unwrap(),
                image_url: String::new(),
                category_id: CategoryId::parse(category).unwrap(),
                seller_id: UserId::parse("seller7").unwrap(),
                seller_name: "Tejidos del Caribe".to_string(),
                stock: 12,
                tags: ["hamaca".to_string()].into_iter().collect(),
                is_active: active,
                is_featured: featured,
                created_at: None,
                updated_at: None,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn default_filter_hides_inactive_products() {
        let filter = ProductFilter::default();
        assert!(filter.matches(&product("cat2", 8500, true, true)));
        assert!(!filter.matches(&product("cat2", 8500, true, false)));

        let all = ProductFilter {
            include_inactive: true,
            ..ProductFilter::default()
        };
        assert!(all.matches(&product("cat2", 8500, true, false)));
    }

    #[test]
    fn category_tag_and_price_criteria_combine() {
        let p = product("cat2", 8500, false, true);

        assert!(ProductFilter::in_category(CategoryId::parse("cat2").unwrap()).matches(&p));
        assert!(!ProductFilter::in_category(CategoryId::parse("cat1").unwrap()).matches(&p));

        let filter = ProductFilter {
            tag: Some("hamaca".to_string()),
            min_price: Some(Price::from_cents(5000).unwrap()),
            max_price: Some(Price::from_cents(8500).unwrap()),
            ..ProductFilter::default()
        };
        assert!(filter.matches(&p));

        let featured = ProductFilter {
            featured_only: true,
            ..ProductFilter::default()
        };
        assert!(!featured.matches(&p));
    }
}
