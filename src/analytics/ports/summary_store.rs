//! Summary store port: cached period rollups keyed by `(start, period type)`.

use crate::analytics::domain::{PeriodSummary, PeriodType};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for summary store operations.
pub type SummaryStoreResult<T> = Result<T, SummaryStoreError>;

/// Persistence contract for period rollups.
///
/// The rollup aggregator is the only writer. Writes are full overwrites of
/// every derived field, so last-writer-wins between concurrent refreshes of
/// the same period is safe.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// Finds the summary for one `(period start, period type)` bucket.
    ///
    /// Returns `None` when the period has never been aggregated.
    async fn find(
        &self,
        period_start: DateTime<Utc>,
        period_type: PeriodType,
    ) -> SummaryStoreResult<Option<PeriodSummary>>;

    /// Inserts the summary, or overwrites every derived field of an existing
    /// row with the same bucket key.
    async fn upsert(&self, summary: &PeriodSummary) -> SummaryStoreResult<()>;

    /// Returns summaries of the given period type whose start falls in
    /// `[from, to]`, ordered chronologically.
    async fn find_in_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        period_type: PeriodType,
    ) -> SummaryStoreResult<Vec<PeriodSummary>>;
}

/// Errors returned by summary store implementations.
#[derive(Debug, Clone, Error)]
pub enum SummaryStoreError {
    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SummaryStoreError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
