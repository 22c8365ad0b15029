//! Public collections: categories and products.

use tracing::{debug, info, instrument};

use mercado_auth::{Access, Collection, Ownership, Principal};
use mercado_catalog::{
    Category, CategoryPatch, NewCategory, NewProduct, Product, ProductFilter, ProductPatch,
};
use mercado_core::{CategoryId, DomainError, Entity, ProductId};

use super::{CatalogStore, StoreError, guard, not_found, now};

impl CatalogStore {
    #[instrument(skip(self, data, principal), fields(category_id = tracing::field::Empty), err)]
    pub fn create_category(
        &self,
        data: NewCategory,
        principal: Option<&Principal>,
    ) -> Result<Category, StoreError> {
        guard(Collection::Categories, Access::Write, principal, Ownership::none())?;

        let category = Category::create(data, now())?;
        tracing::Span::current().record("category_id", category.id.as_str());

        let category = self.categories.insert(category)?;
        info!(name = %category.name, "category created");
        Ok(category)
    }

    #[instrument(skip(self), fields(category_id = %id), err)]
    pub fn read_category(&self, id: &CategoryId) -> Result<Category, StoreError> {
        guard(Collection::Categories, Access::Read, None, Ownership::none())?;
        let category = self
            .categories
            .get(id)?
            .ok_or_else(|| not_found::<Category>(id))?;
        debug!("category read");
        Ok(category)
    }

    /// Categories ordered by id; inactive ones only when asked for.
    pub fn list_categories(&self, include_inactive: bool) -> Result<Vec<Category>, StoreError> {
        guard(Collection::Categories, Access::Read, None, Ownership::none())?;
        Ok(self
            .categories
            .list()?
            .into_iter()
            .filter(|c| include_inactive || c.is_active)
            .collect())
    }

    #[instrument(skip(self, patch, principal), fields(category_id = %id), err)]
    pub fn update_category(
        &self,
        id: &CategoryId,
        patch: &CategoryPatch,
        principal: Option<&Principal>,
    ) -> Result<Category, StoreError> {
        guard(Collection::Categories, Access::Write, principal, Ownership::none())?;

        let now = now();
        let category = self
            .categories
            .modify(id, &mut |c| Ok(c.patched(patch, now)?))?;
        info!("category updated");
        Ok(category)
    }

    /// Soft-deactivate a category. Its products are left as they are.
    pub fn deactivate_category(
        &self,
        id: &CategoryId,
        principal: Option<&Principal>,
    ) -> Result<Category, StoreError> {
        let patch = CategoryPatch {
            is_active: Some(false),
            ..CategoryPatch::default()
        };
        self.update_category(id, &patch, principal)
    }

    #[instrument(
        skip(self, data, principal),
        fields(product_id = tracing::field::Empty, category_id = %data.category_id),
        err
    )]
    pub fn create_product(
        &self,
        data: NewProduct,
        principal: Option<&Principal>,
    ) -> Result<Product, StoreError> {
        guard(Collection::Products, Access::Write, principal, Ownership::none())?;

        let product = Product::create(data, now())?;
        tracing::Span::current().record("product_id", product.id.as_str());
        self.ensure_category_exists(&product.category_id)?;

        let product = self.products.insert(product)?;
        self.refresh_product_count(&product.category_id)?;
        info!(name = %product.name, stock = product.stock, "product created");
        Ok(product)
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    pub fn read_product(&self, id: &ProductId) -> Result<Product, StoreError> {
        guard(Collection::Products, Access::Read, None, Ownership::none())?;
        let product = self
            .products
            .get(id)?
            .ok_or_else(|| not_found::<Product>(id))?;
        debug!("product read");
        Ok(product)
    }

    /// Products matching the filter, ordered by id.
    pub fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        guard(Collection::Products, Access::Read, None, Ownership::none())?;
        Ok(self
            .products
            .list()?
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect())
    }

    #[instrument(skip(self, patch, principal), fields(product_id = %id), err)]
    pub fn update_product(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
        principal: Option<&Principal>,
    ) -> Result<Product, StoreError> {
        guard(Collection::Products, Access::Write, principal, Ownership::none())?;
        if let Some(category_id) = &patch.category_id {
            self.ensure_category_exists(category_id)?;
        }

        let now = now();
        let mut previous: Option<Product> = None;
        let product = self.products.modify(id, &mut |p| {
            previous = Some(p.clone());
            Ok(p.patched(patch, now)?)
        })?;

        self.refresh_counts_after_write(previous.as_ref(), &product)?;
        info!("product updated");
        Ok(product)
    }

    /// Soft-deactivate a product; it stops counting toward its category.
    pub fn deactivate_product(
        &self,
        id: &ProductId,
        principal: Option<&Principal>,
    ) -> Result<Product, StoreError> {
        let patch = ProductPatch {
            is_active: Some(false),
            ..ProductPatch::default()
        };
        self.update_product(id, &patch, principal)
    }

    /// Apply a signed stock delta. Stock never goes negative.
    #[instrument(skip(self, principal), fields(product_id = %id), err)]
    pub fn adjust_stock(
        &self,
        id: &ProductId,
        delta: i64,
        principal: Option<&Principal>,
    ) -> Result<Product, StoreError> {
        guard(Collection::Products, Access::Write, principal, Ownership::none())?;

        let now = now();
        let product = self
            .products
            .modify(id, &mut |p| Ok(p.with_stock_adjusted(delta, now)?))?;
        info!(stock = product.stock, "stock adjusted");
        Ok(product)
    }

    /// Rebuild every category's product count from the stored products.
    ///
    /// Returns the number of categories whose count was corrected.
    #[instrument(skip(self), err)]
    pub fn recompute_product_counts(&self) -> Result<usize, StoreError> {
        let mut corrected = 0;
        for category in self.categories.list()? {
            let refreshed = self.refresh_product_count(&category.id)?;
            if refreshed.product_count != category.product_count {
                corrected += 1;
            }
        }
        info!(corrected, "product counts recomputed");
        Ok(corrected)
    }

    fn ensure_category_exists(&self, id: &CategoryId) -> Result<(), StoreError> {
        match self.categories.get(id)? {
            Some(_) => Ok(()),
            None => Err(DomainError::foreign_key(Category::KIND, id).into()),
        }
    }

    fn refresh_counts_after_write(
        &self,
        previous: Option<&Product>,
        current: &Product,
    ) -> Result<(), StoreError> {
        let counted_before = previous.map(|p| (p.category_id.clone(), p.is_listed()));
        if counted_before != Some((current.category_id.clone(), current.is_listed())) {
            self.refresh_product_count(&current.category_id)?;
            if let Some((old_category, _)) = counted_before {
                if old_category != current.category_id {
                    self.refresh_product_count(&old_category)?;
                }
            }
        }
        Ok(())
    }

    /// Recount the active products of a category under the category's write lock.
    fn refresh_product_count(&self, id: &CategoryId) -> Result<Category, StoreError> {
        let products = &self.products;
        self.categories.modify(id, &mut |c| {
            let count = products
                .list()?
                .iter()
                .filter(|p| &p.category_id == id && p.is_listed())
                .count();
            let count = u32::try_from(count)
                .map_err(|_| StoreError::Backend("product count out of range".to_string()))?;

            let mut next = c.clone();
            next.product_count = count;
            Ok(next)
        })
    }
}
