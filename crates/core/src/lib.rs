//! Domain building blocks shared by every crate: ids, errors, entity traits.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, require_non_blank};
pub use id::{CartId, CategoryId, OrderId, ProductId, UserId};
pub use value_object::ValueObject;
