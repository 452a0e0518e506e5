//! Event store port: durable, append-only session and interaction records.

use crate::analytics::domain::{
    Interaction, NewInteraction, Session, SessionActivity, SessionId, TimeWindow,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for event store operations.
pub type EventStoreResult<T> = Result<T, EventStoreError>;

/// Append-only persistence contract for sessions and interactions.
///
/// The event store accepts concurrent readers and writers without
/// subsystem-level locking; atomicity is deferred to the storage engine.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Inserts a new session row.
    ///
    /// When a row with the same session identifier already exists, the
    /// existing row is returned unchanged, making concurrent opens race-safe.
    async fn insert_session(&self, session: &Session) -> EventStoreResult<Session>;

    /// Finds a session by identifier.
    ///
    /// Returns `None` when the session does not exist.
    async fn find_session(&self, session_id: &SessionId) -> EventStoreResult<Option<Session>>;

    /// Persists changes to an existing session (the end timestamp).
    ///
    /// # Errors
    ///
    /// Returns [`EventStoreError::SessionNotFound`] when no row exists for
    /// the session identifier.
    async fn update_session(&self, session: &Session) -> EventStoreResult<()>;

    /// Appends one interaction, returning it with its assigned identifier.
    ///
    /// Interactions are never updated or deleted once written.
    async fn insert_interaction(&self, event: &NewInteraction) -> EventStoreResult<Interaction>;

    /// Returns sessions whose start timestamp falls inside the window,
    /// ordered by start timestamp.
    async fn sessions_started_in(&self, window: &TimeWindow) -> EventStoreResult<Vec<Session>>;

    /// Returns interactions whose timestamp falls inside the window, in
    /// append order.
    async fn interactions_in(&self, window: &TimeWindow) -> EventStoreResult<Vec<Interaction>>;

    /// Returns the most recent interactions for one session, oldest first,
    /// bounded by `limit`.
    async fn recent_interactions(
        &self,
        session_id: &SessionId,
        limit: usize,
    ) -> EventStoreResult<Vec<Interaction>>;

    /// Returns the most recently started sessions with their interaction
    /// counts, newest first, bounded by `limit`.
    async fn recent_sessions(&self, limit: usize) -> EventStoreResult<Vec<SessionActivity>>;
}

/// Errors returned by event store implementations.
#[derive(Debug, Clone, Error)]
pub enum EventStoreError {
    /// The referenced session does not exist.
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl EventStoreError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
