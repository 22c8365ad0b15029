use anyhow::Context;

use mercado_auth::Principal;
use mercado_infra::{AppConfig, CatalogStore};
use mercado_seed::SeedData;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    mercado_observability::init_with(config.log_format);

    let data = match &config.seed_file {
        Some(path) => SeedData::from_path(path)
            .with_context(|| format!("loading seed file {}", path.display()))?,
        None => SeedData::bundled().context("parsing bundled sample data")?,
    };

    let store = CatalogStore::in_memory();
    let principal = Principal::new(config.seed_principal.clone());
    let report = mercado_seed::load(&store, data, &principal)?;

    for category in store.list_categories(true)? {
        tracing::info!(
            category_id = %category.id,
            name = %category.name,
            product_count = category.product_count,
            "category"
        );
    }
    tracing::info!(
        categories = report.categories_created,
        products = report.products_created,
        skipped = report.skipped,
        "seeding finished"
    );
    Ok(())
}
