//! `PostgreSQL` analytics adapters backed by Diesel.

mod event_store;
mod models;
pub(crate) mod schema;
mod summary_store;

pub use event_store::PostgresEventStore;
pub use summary_store::PostgresSummaryStore;
