//! Catalog port contracts.

mod repository;

pub use repository::{Catalog, CatalogError, CatalogResult};
