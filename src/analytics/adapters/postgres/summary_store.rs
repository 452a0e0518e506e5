//! `PostgreSQL` implementation of the [`SummaryStore`] port.

use super::{
    models::{SummaryRow, row_to_summary, summary_to_new_row},
    schema::analytics_summaries,
};
use crate::analytics::{
    domain::{PeriodSummary, PeriodType},
    ports::{SummaryStore, SummaryStoreError, SummaryStoreResult},
};
use crate::config::PgPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed summary store.
#[derive(Debug, Clone)]
pub struct PostgresSummaryStore {
    pool: PgPool,
}

impl PostgresSummaryStore {
    /// Creates a new summary store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> SummaryStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> SummaryStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(SummaryStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(SummaryStoreError::persistence)?
    }
}

#[async_trait]
impl SummaryStore for PostgresSummaryStore {
    async fn find(
        &self,
        period_start: DateTime<Utc>,
        period_type: PeriodType,
    ) -> SummaryStoreResult<Option<PeriodSummary>> {
        let label = period_type.as_str();
        self.run_blocking(move |connection| {
            let row = analytics_summaries::table
                .filter(analytics_summaries::date.eq(period_start))
                .filter(analytics_summaries::period_type.eq(label))
                .select(SummaryRow::as_select())
                .first::<SummaryRow>(connection)
                .optional()
                .map_err(SummaryStoreError::persistence)?;
            row.map(row_to_summary).transpose()
        })
        .await
    }

    async fn upsert(&self, summary: &PeriodSummary) -> SummaryStoreResult<()> {
        let new_row = summary_to_new_row(summary);

        self.run_blocking(move |connection| {
            diesel::insert_into(analytics_summaries::table)
                .values(&new_row)
                .on_conflict((analytics_summaries::date, analytics_summaries::period_type))
                .do_update()
                .set(&new_row)
                .execute(connection)
                .map_err(SummaryStoreError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn find_in_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        period_type: PeriodType,
    ) -> SummaryStoreResult<Vec<PeriodSummary>> {
        let label = period_type.as_str();
        self.run_blocking(move |connection| {
            let rows = analytics_summaries::table
                .filter(analytics_summaries::date.ge(from))
                .filter(analytics_summaries::date.le(to))
                .filter(analytics_summaries::period_type.eq(label))
                .order(analytics_summaries::date.asc())
                .select(SummaryRow::as_select())
                .load::<SummaryRow>(connection)
                .map_err(SummaryStoreError::persistence)?;
            rows.into_iter().map(row_to_summary).collect()
        })
        .await
    }
}
