//! In-memory implementation of the [`SummaryStore`] port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::analytics::{
    domain::{PeriodSummary, PeriodType},
    ports::{SummaryStore, SummaryStoreError, SummaryStoreResult},
};

type BucketKey = (DateTime<Utc>, PeriodType);

/// Thread-safe in-memory summary store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySummaryStore {
    state: Arc<RwLock<HashMap<BucketKey, PeriodSummary>>>,
}

impl InMemorySummaryStore {
    /// Creates an empty summary store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> SummaryStoreError {
    SummaryStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl SummaryStore for InMemorySummaryStore {
    async fn find(
        &self,
        period_start: DateTime<Utc>,
        period_type: PeriodType,
    ) -> SummaryStoreResult<Option<PeriodSummary>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.get(&(period_start, period_type)).cloned())
    }

    async fn upsert(&self, summary: &PeriodSummary) -> SummaryStoreResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.insert(
            (summary.period_start(), summary.period_type()),
            summary.clone(),
        );
        Ok(())
    }

    async fn find_in_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        period_type: PeriodType,
    ) -> SummaryStoreResult<Vec<PeriodSummary>> {
        let state = self.state.read().map_err(lock_poisoned)?;

        let mut summaries: Vec<PeriodSummary> = state
            .values()
            .filter(|s| {
                s.period_type() == period_type
                    && s.period_start() >= from
                    && s.period_start() <= to
            })
            .cloned()
            .collect();
        summaries.sort_by_key(PeriodSummary::period_start);
        Ok(summaries)
    }
}
