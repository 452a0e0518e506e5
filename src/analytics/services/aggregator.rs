//! Period rollup aggregation.
//!
//! Summaries are always recomputed from the event store over the full period
//! window, never incrementally maintained, so recomputation is safe to
//! repeat: concurrent refreshes of the same period produce the same
//! overwrite and last-writer-wins costs only wasted work.

use crate::analytics::{
    domain::{
        Intent, Interaction, PeriodSummary, PeriodType, Session, SummaryMetrics,
    },
    ports::{EventStore, EventStoreError, SummaryStore, SummaryStoreError},
};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for summary generation.
#[derive(Debug, Error)]
pub enum SummaryServiceError {
    /// Event store scan failed.
    #[error(transparent)]
    Events(#[from] EventStoreError),
    /// Summary persistence failed.
    #[error(transparent)]
    Summaries(#[from] SummaryStoreError),
}

/// Result type for summary generation.
pub type SummaryServiceResult<T> = Result<T, SummaryServiceError>;

/// Computes and refreshes period rollups from the event store.
#[derive(Clone)]
pub struct SummaryService<E, S>
where
    E: EventStore,
    S: SummaryStore,
{
    events: Arc<E>,
    summaries: Arc<S>,
}

impl<E, S> SummaryService<E, S>
where
    E: EventStore,
    S: SummaryStore,
{
    /// Creates a new summary service.
    #[must_use]
    pub const fn new(events: Arc<E>, summaries: Arc<S>) -> Self {
        Self { events, summaries }
    }

    /// Generates or refreshes the rollup for one period.
    ///
    /// Scans sessions and interactions inside the half-open period window,
    /// recomputes every derived field, and overwrites the stored summary in
    /// place. Deterministic given a stable window: consecutive calls yield
    /// identical results.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryServiceError`] when the window scan or the summary
    /// write fails.
    pub async fn generate_summary(
        &self,
        period_start: DateTime<Utc>,
        period_type: PeriodType,
    ) -> SummaryServiceResult<PeriodSummary> {
        let window = period_type.window(period_start);
        let sessions = self.events.sessions_started_in(&window).await?;
        let interactions = self.events.interactions_in(&window).await?;

        let metrics = compute_metrics(&sessions, &interactions);
        let summary = PeriodSummary::new(period_start, period_type, metrics);
        self.summaries.upsert(&summary).await?;

        info!(
            period_start = %period_start,
            period_type = %period_type,
            sessions = summary.metrics().total_sessions,
            interactions = summary.metrics().total_interactions,
            "refreshed analytics summary"
        );
        Ok(summary)
    }
}

/// Derives all summary metrics from one window's sessions and interactions.
///
/// A window with no qualifying rows yields zero counts, `None` averages and
/// empty distributions; there is no division by zero anywhere.
fn compute_metrics(sessions: &[Session], interactions: &[Interaction]) -> SummaryMetrics {
    let unique_users = sessions
        .iter()
        .filter_map(Session::user_id)
        .collect::<BTreeSet<_>>()
        .len() as u64;

    let durations: Vec<f64> = sessions
        .iter()
        .filter_map(Session::duration_seconds)
        .collect();
    let latencies: Vec<f64> = interactions
        .iter()
        .filter_map(|i| i.event().response_time_ms)
        .map(|ms| ms as f64)
        .collect();

    let mut intent_distribution = BTreeMap::new();
    let mut error_distribution = BTreeMap::new();
    let mut platform_distribution = BTreeMap::new();
    for interaction in interactions {
        if let Some(intent) = interaction.detected_intent() {
            *intent_distribution
                .entry(intent.as_str().to_owned())
                .or_insert(0) += 1;
        }
        if let Some(error_type) = interaction.event().error_type.as_deref() {
            *error_distribution.entry(error_type.to_owned()).or_insert(0) += 1;
        }
    }
    for session in sessions {
        if let Some(platform) = session.platform() {
            *platform_distribution.entry(platform.to_owned()).or_insert(0) += 1;
        }
    }

    SummaryMetrics {
        total_sessions: sessions.len() as u64,
        total_interactions: interactions.len() as u64,
        unique_users,
        avg_session_duration_seconds: mean(&durations),
        avg_response_time_ms: mean(&latencies),
        products_shown_count: interactions
            .iter()
            .map(|i| i.event().products_shown)
            .sum(),
        product_search_count: interactions
            .iter()
            .filter(|i| i.detected_intent() == Some(Intent::ProductSearch))
            .count() as u64,
        error_count: interactions
            .iter()
            .filter(|i| !i.event().was_successful)
            .count() as u64,
        intent_distribution,
        error_distribution,
        platform_distribution,
    }
}

/// Arithmetic mean, or `None` for an empty slice.
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
