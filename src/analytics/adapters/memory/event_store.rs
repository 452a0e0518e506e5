//! In-memory implementation of the [`EventStore`] port.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::analytics::{
    domain::{
        Interaction, InteractionId, NewInteraction, Session, SessionActivity, SessionId,
        TimeWindow,
    },
    ports::{EventStore, EventStoreError, EventStoreResult},
};

/// Thread-safe in-memory event store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    state: Arc<RwLock<EventState>>,
}

#[derive(Debug, Default)]
struct EventState {
    sessions: HashMap<SessionId, Session>,
    interactions: Vec<Interaction>,
    next_interaction_id: i64,
}

impl InMemoryEventStore {
    /// Creates an empty event store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> EventStoreError {
    EventStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn insert_session(&self, session: &Session) -> EventStoreResult<Session> {
        let mut state = self.state.write().map_err(lock_poisoned)?;

        if let Some(existing) = state.sessions.get(session.session_id()) {
            return Ok(existing.clone());
        }

        state
            .sessions
            .insert(session.session_id().clone(), session.clone());
        Ok(session.clone())
    }

    async fn find_session(&self, session_id: &SessionId) -> EventStoreResult<Option<Session>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.sessions.get(session_id).cloned())
    }

    async fn update_session(&self, session: &Session) -> EventStoreResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;

        if !state.sessions.contains_key(session.session_id()) {
            return Err(EventStoreError::SessionNotFound(
                session.session_id().clone(),
            ));
        }

        state
            .sessions
            .insert(session.session_id().clone(), session.clone());
        Ok(())
    }

    async fn insert_interaction(&self, event: &NewInteraction) -> EventStoreResult<Interaction> {
        let mut state = self.state.write().map_err(lock_poisoned)?;

        state.next_interaction_id += 1;
        let interaction = Interaction::from_persisted(
            InteractionId::new(state.next_interaction_id),
            event.clone(),
        );
        state.interactions.push(interaction.clone());
        Ok(interaction)
    }

    async fn sessions_started_in(&self, window: &TimeWindow) -> EventStoreResult<Vec<Session>> {
        let state = self.state.read().map_err(lock_poisoned)?;

        let mut sessions: Vec<Session> = state
            .sessions
            .values()
            .filter(|s| window.contains(s.start_time()))
            .cloned()
            .collect();
        sessions.sort_by_key(Session::start_time);
        Ok(sessions)
    }

    async fn interactions_in(&self, window: &TimeWindow) -> EventStoreResult<Vec<Interaction>> {
        let state = self.state.read().map_err(lock_poisoned)?;

        // Vec order is append order; no re-sort needed.
        let interactions = state
            .interactions
            .iter()
            .filter(|i| window.contains(i.timestamp()))
            .cloned()
            .collect();
        Ok(interactions)
    }

    async fn recent_interactions(
        &self,
        session_id: &SessionId,
        limit: usize,
    ) -> EventStoreResult<Vec<Interaction>> {
        let state = self.state.read().map_err(lock_poisoned)?;

        let matching: Vec<Interaction> = state
            .interactions
            .iter()
            .filter(|i| i.session_id() == session_id)
            .cloned()
            .collect();
        let skip = matching.len().saturating_sub(limit);
        Ok(matching.into_iter().skip(skip).collect())
    }

    async fn recent_sessions(&self, limit: usize) -> EventStoreResult<Vec<SessionActivity>> {
        let state = self.state.read().map_err(lock_poisoned)?;

        let mut sessions: Vec<Session> = state.sessions.values().cloned().collect();
        sessions.sort_by_key(|s| std::cmp::Reverse(s.start_time()));
        sessions.truncate(limit);

        let activity = sessions
            .into_iter()
            .map(|session| {
                let interaction_count = state
                    .interactions
                    .iter()
                    .filter(|i| i.session_id() == session.session_id())
                    .count() as u64;
                SessionActivity {
                    session,
                    interaction_count,
                }
            })
            .collect();
        Ok(activity)
    }
}
