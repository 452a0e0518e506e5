//! Catalog domain types.

mod error;
mod order;
mod product;

pub use error::CatalogDomainError;
pub use order::{Order, OrderId, OrderLine, OrderStatus};
pub use product::{Product, ProductId};
