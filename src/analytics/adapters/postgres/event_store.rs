//! `PostgreSQL` implementation of the [`EventStore`] port.

use super::{
    models::{
        InteractionRow, SessionRow, interaction_to_new_row, row_to_interaction, row_to_session,
        session_to_new_row,
    },
    schema::{chat_interactions, chat_sessions},
};
use crate::analytics::{
    domain::{
        Interaction, NewInteraction, Session, SessionActivity, SessionId, TimeWindow,
    },
    ports::{EventStore, EventStoreError, EventStoreResult},
};
use crate::config::PgPool;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed event store.
#[derive(Debug, Clone)]
pub struct PostgresEventStore {
    pool: PgPool,
}

impl PostgresEventStore {
    /// Creates a new event store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> EventStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> EventStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(EventStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(EventStoreError::persistence)?
    }
}

fn load_session_row(
    connection: &mut PgConnection,
    session_id: &str,
) -> EventStoreResult<Option<SessionRow>> {
    chat_sessions::table
        .filter(chat_sessions::session_id.eq(session_id))
        .select(SessionRow::as_select())
        .first::<SessionRow>(connection)
        .optional()
        .map_err(EventStoreError::persistence)
}

#[async_trait]
impl EventStore for PostgresEventStore {
    async fn insert_session(&self, session: &Session) -> EventStoreResult<Session> {
        let new_row = session_to_new_row(session);
        let id = session.session_id().clone();

        self.run_blocking(move |connection| {
            // Conflicting concurrent opens both land here; do_nothing keeps
            // the first row and the re-read returns it to both callers.
            diesel::insert_into(chat_sessions::table)
                .values(&new_row)
                .on_conflict(chat_sessions::session_id)
                .do_nothing()
                .execute(connection)
                .map_err(EventStoreError::persistence)?;

            let row = load_session_row(connection, id.as_str())?
                .ok_or_else(|| EventStoreError::SessionNotFound(id.clone()))?;
            row_to_session(row)
        })
        .await
    }

    async fn find_session(&self, session_id: &SessionId) -> EventStoreResult<Option<Session>> {
        let id = session_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            load_session_row(connection, &id)?
                .map(row_to_session)
                .transpose()
        })
        .await
    }

    async fn update_session(&self, session: &Session) -> EventStoreResult<()> {
        let id = session.session_id().clone();
        let end_time = session.end_time();

        self.run_blocking(move |connection| {
            let updated = diesel::update(
                chat_sessions::table.filter(chat_sessions::session_id.eq(id.as_str())),
            )
            .set(chat_sessions::end_time.eq(end_time))
            .execute(connection)
            .map_err(EventStoreError::persistence)?;

            if updated == 0 {
                return Err(EventStoreError::SessionNotFound(id.clone()));
            }
            Ok(())
        })
        .await
    }

    async fn insert_interaction(&self, event: &NewInteraction) -> EventStoreResult<Interaction> {
        let new_row = interaction_to_new_row(event);

        self.run_blocking(move |connection| {
            let row = diesel::insert_into(chat_interactions::table)
                .values(&new_row)
                .returning(InteractionRow::as_returning())
                .get_result::<InteractionRow>(connection)
                .map_err(EventStoreError::persistence)?;
            row_to_interaction(row)
        })
        .await
    }

    async fn sessions_started_in(&self, window: &TimeWindow) -> EventStoreResult<Vec<Session>> {
        let (start, end) = (window.start(), window.end());
        self.run_blocking(move |connection| {
            let rows = chat_sessions::table
                .filter(chat_sessions::start_time.ge(start))
                .filter(chat_sessions::start_time.lt(end))
                .order(chat_sessions::start_time.asc())
                .select(SessionRow::as_select())
                .load::<SessionRow>(connection)
                .map_err(EventStoreError::persistence)?;
            rows.into_iter().map(row_to_session).collect()
        })
        .await
    }

    async fn interactions_in(&self, window: &TimeWindow) -> EventStoreResult<Vec<Interaction>> {
        let (start, end) = (window.start(), window.end());
        self.run_blocking(move |connection| {
            let rows = chat_interactions::table
                .filter(chat_interactions::timestamp.ge(start))
                .filter(chat_interactions::timestamp.lt(end))
                .order(chat_interactions::id.asc())
                .select(InteractionRow::as_select())
                .load::<InteractionRow>(connection)
                .map_err(EventStoreError::persistence)?;
            rows.into_iter().map(row_to_interaction).collect()
        })
        .await
    }

    async fn recent_interactions(
        &self,
        session_id: &SessionId,
        limit: usize,
    ) -> EventStoreResult<Vec<Interaction>> {
        let id = session_id.as_str().to_owned();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.run_blocking(move |connection| {
            let rows = chat_interactions::table
                .filter(chat_interactions::session_id.eq(&id))
                .order(chat_interactions::id.desc())
                .limit(limit)
                .select(InteractionRow::as_select())
                .load::<InteractionRow>(connection)
                .map_err(EventStoreError::persistence)?;
            let mut interactions = rows
                .into_iter()
                .map(row_to_interaction)
                .collect::<EventStoreResult<Vec<_>>>()?;
            interactions.reverse();
            Ok(interactions)
        })
        .await
    }

    async fn recent_sessions(&self, limit: usize) -> EventStoreResult<Vec<SessionActivity>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.run_blocking(move |connection| {
            let rows = chat_sessions::table
                .order(chat_sessions::start_time.desc())
                .limit(limit)
                .select(SessionRow::as_select())
                .load::<SessionRow>(connection)
                .map_err(EventStoreError::persistence)?;

            rows.into_iter()
                .map(|row| {
                    let interaction_count: i64 = chat_interactions::table
                        .filter(chat_interactions::session_id.eq(&row.session_id))
                        .count()
                        .get_result(connection)
                        .map_err(EventStoreError::persistence)?;
                    Ok(SessionActivity {
                        session: row_to_session(row)?,
                        interaction_count: u64::try_from(interaction_count).unwrap_or(0),
                    })
                })
                .collect()
        })
        .await
    }
}
