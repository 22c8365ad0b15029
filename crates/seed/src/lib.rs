//! Bulk loader for sample catalog data.
//!
//! Feeds categories and then products into a [`CatalogStore`] through the
//! normal write path, so every record is validated and authorized like any
//! other write. Ids that already exist are skipped, which makes reseeding a
//! no-op.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use mercado_auth::Principal;
use mercado_catalog::{NewCategory, NewProduct};
use mercado_infra::{CatalogStore, StoreError};

/// The bundled sample records (4 categories, 8 products).
pub const SAMPLE_DATA: &str = include_str!("../fixtures/sample_data.json");

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed seed data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Records to load, in the shape of the seed JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedData {
    #[serde(default)]
    pub categories: Vec<NewCategory>,
    #[serde(default)]
    pub products: Vec<NewProduct>,
}

impl SeedData {
    pub fn bundled() -> Result<Self, SeedError> {
        Self::from_json(SAMPLE_DATA)
    }

    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, SeedError> {
        let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// What a load did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub categories_created: usize,
    pub products_created: usize,
    /// Records whose id was already present.
    pub skipped: usize,
}

/// Load `data` into `store` acting as `principal`.
///
/// Categories go first so products can resolve their category. The first
/// error other than an id conflict aborts the load; records written before it
/// stay in place.
#[instrument(skip(store, data, principal), fields(seeder = %principal.user_id), err)]
pub fn load(
    store: &CatalogStore,
    data: SeedData,
    principal: &Principal,
) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    for category in data.categories {
        match store.create_category(category, Some(principal)) {
            Ok(_) => report.categories_created += 1,
            Err(StoreError::Conflict(reason)) => {
                info!(%reason, "category skipped");
                report.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    for product in data.products {
        match store.create_product(product, Some(principal)) {
            Ok(_) => report.products_created += 1,
            Err(StoreError::Conflict(reason)) => {
                info!(%reason, "product skipped");
                report.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!(
        categories = report.categories_created,
        products = report.products_created,
        skipped = report.skipped,
        "seed loaded"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mercado_catalog::ProductFilter;
    use mercado_core::{CategoryId, ProductId, UserId};

    fn seeder() -> Principal {
        Principal::new(UserId::parse("seed-loader").unwrap())
    }

    fn count(store: &CatalogStore, id: &str) -> u32 {
        store
            .read_category(&CategoryId::parse(id).unwrap())
            .unwrap()
            .product_count
    }

    #[test]
    fn bundled_data_loads_completely() {
        let store = CatalogStore::in_memory();
        let report = load(&store, SeedData::bundled().unwrap(), &seeder()).unwrap();

        assert_eq!(
            report,
            SeedReport {
                categories_created: 4,
                products_created: 8,
                skipped: 0
            }
        );
        assert_eq!(store.list_categories(false).unwrap().len(), 4);
        assert_eq!(store.list_products(&ProductFilter::default()).unwrap().len(), 8);

        assert_eq!(count(&store, "cat1"), 4);
        assert_eq!(count(&store, "cat2"), 2);
        assert_eq!(count(&store, "cat3"), 1);
        assert_eq!(count(&store, "cat4"), 1);
    }

    #[test]
    fn sample_fields_survive_loading() {
        let store = CatalogStore::in_memory();
        load(&store, SeedData::bundled().unwrap(), &seeder()).unwrap();

        let honey = store.read_product(&ProductId::parse("prod1").unwrap()).unwrap();
        assert_eq!(honey.stock, 50);
        assert_eq!(honey.price.cents(), 2599);
        assert_eq!(honey.created_at.to_rfc3339(), "2024-01-15T00:00:00+00:00");
        assert!(honey.tags.contains("sin-preservantes"));

        let cheese = store.read_product(&ProductId::parse("prod2").unwrap()).unwrap();
        assert_eq!(cheese.price.to_string(), "18.50");
    }

    #[test]
    fn reseeding_skips_existing_records() {
        let store = CatalogStore::in_memory();
        load(&store, SeedData::bundled().unwrap(), &seeder()).unwrap();
        let again = load(&store, SeedData::bundled().unwrap(), &seeder()).unwrap();

        assert_eq!(again.categories_created, 0);
        assert_eq!(again.products_created, 0);
        assert_eq!(again.skipped, 12);
        assert_eq!(count(&store, "cat1"), 4);
    }

    #[test]
    fn product_with_unknown_category_aborts_load() {
        let json = r##"{
            "categories": [{ "id": "cat1", "name": "Alimentos", "color": "#4CAF50" }],
            "products": [{
                "id": "prod1", "name": "Miel", "price": 25.99, "categoryId": "cat99",
                "sellerId": "seller1", "sellerName": "Apiario"
            }]
        }"##;
        let store = CatalogStore::in_memory();
        let err = load(&store, SeedData::from_json(json).unwrap(), &seeder()).unwrap_err();

        assert!(matches!(err, SeedError::Store(StoreError::ForeignKey { .. })));
        assert_eq!(store.list_categories(false).unwrap().len(), 1);
    }

    #[test]
    fn malformed_files_are_rejected() {
        assert!(matches!(
            SeedData::from_json(r#"{ "orders": [] }"#),
            Err(SeedError::Parse(_))
        ));
        assert!(matches!(
            SeedData::from_path(Path::new("/nonexistent/seed.json")),
            Err(SeedError::Io { .. })
        ));
    }
}
