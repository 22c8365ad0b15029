//! Marketplace records: categories, products, orders, carts, user profiles.
//!
//! This crate contains the record types and their validation rules, implemented
//! purely as deterministic domain logic (no IO, no storage, no authorization).
//! Every write takes the current time explicitly so behaviour is reproducible.

pub mod cart;
pub mod category;
pub mod filter;
pub mod order;
pub mod price;
pub mod product;
pub mod user;

mod validate;

pub use cart::{Cart, CartItem, CartPatch, NewCart};
pub use category::{Category, CategoryPatch, HexColor, NewCategory};
pub use filter::ProductFilter;
pub use order::{NewOrder, Order, OrderItem, OrderLine, OrderPatch, OrderStatus};
pub use price::Price;
pub use product::{NewProduct, Product, ProductPatch};
pub use user::{NewUserProfile, UserProfile, UserProfilePatch};
