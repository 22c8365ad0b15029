use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use std::collections::BTreeSet;

use mercado_auth::Principal;
use mercado_catalog::{HexColor, NewCategory, NewProduct, Price, ProductFilter};
use mercado_core::{CategoryId, ProductId, UserId};
use mercado_infra::CatalogStore;

const CATEGORIES: usize = 4;

fn admin() -> Principal {
    Principal::new(UserId::parse("bench-admin").unwrap())
}

fn category_id(n: usize) -> CategoryId {
    CategoryId::parse(format!("cat{n}")).unwrap()
}

fn product(n: usize) -> NewProduct {
    NewProduct {
        id: Some(ProductId::parse(format!("prod{n:06}")).unwrap()),
        name: format!("Producto {n}"),
        description: String::new(),
        price: Price::from_cents(100 + n as u64).unwrap(),
        image_url: String::new(),
        category_id: category_id(n % CATEGORIES + 1),
        seller_id: UserId::parse("seller1").unwrap(),
        seller_name: "Vendedor".to_string(),
        stock: (n % 7) as u32,
        tags: BTreeSet::from(["bench".to_string()]),
        is_active: n % 10 != 0,
        is_featured: n % 3 == 0,
        created_at: None,
        updated_at: None,
    }
}

/// Store with `CATEGORIES` categories and `products` products spread across them.
fn seeded_store(products: usize) -> CatalogStore {
    let store = CatalogStore::in_memory();
    let admin = admin();
    for n in 1..=CATEGORIES {
        let color = HexColor::parse("#2196F3").unwrap();
        let data = NewCategory::new(format!("Categoría {n}"), color).with_id(category_id(n));
        store.create_category(data, Some(&admin)).unwrap();
    }
    for n in 0..products {
        store.create_product(product(n), Some(&admin)).unwrap();
    }
    store
}

fn bench_write_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_latency");
    group.sample_size(200);

    group.bench_function("create_product_with_count_refresh", |b| {
        let store = seeded_store(100);
        let admin = admin();
        let mut n = 100;
        b.iter(|| {
            n += 1;
            black_box(store.create_product(product(n), Some(&admin)).unwrap());
        });
    });

    group.bench_function("adjust_stock", |b| {
        let store = seeded_store(100);
        let admin = admin();
        let id = ProductId::parse("prod000001").unwrap();
        b.iter(|| {
            store.adjust_stock(&id, 1, Some(&admin)).unwrap();
            black_box(store.adjust_stock(&id, -1, Some(&admin)).unwrap());
        });
    });

    group.finish();
}

fn bench_list_products(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_products");

    for size in [10, 100, 1000].iter() {
        let store = seeded_store(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("in_category", size), size, |b, _| {
            let filter = ProductFilter::in_category(category_id(1));
            b.iter(|| black_box(store.list_products(&filter).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("featured_in_stock", size), size, |b, _| {
            let filter = ProductFilter {
                featured_only: true,
                in_stock_only: true,
                ..ProductFilter::default()
            };
            b.iter(|| black_box(store.list_products(&filter).unwrap()));
        });
    }

    group.finish();
}

fn bench_recompute_product_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompute_product_counts");

    for size in [100, 1000, 10000].iter() {
        let store = seeded_store(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(store.recompute_product_counts().unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_write_latency,
    bench_list_products,
    bench_recompute_product_counts
);
criterion_main!(benches);
