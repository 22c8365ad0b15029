//! Infrastructure layer: record storage, the catalog store service, configuration.

pub mod catalog_store;
pub mod config;
pub mod read_model;

pub use catalog_store::{Backends, CatalogStore, StoreError};
pub use config::{AppConfig, ConfigError};
