//! Port contracts for analytics persistence.

mod event_store;
mod summary_store;

pub use event_store::{EventStore, EventStoreError, EventStoreResult};
pub use summary_store::{SummaryStore, SummaryStoreError, SummaryStoreResult};
