//! In-memory analytics adapters.
//!
//! Back the unit tests and the document-store-free deployment mode; state is
//! process-local and lost on restart.

mod event_store;
mod summary_store;

pub use event_store::InMemoryEventStore;
pub use summary_store::InMemorySummaryStore;
