//! `PostgreSQL` catalog adapter: Diesel schema, row models and the
//! [`Catalog`](crate::catalog::ports::Catalog) implementation.

mod models;
mod repository;
mod schema;

pub use repository::PostgresCatalog;
