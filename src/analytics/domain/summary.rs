//! Derived, cached rollups of session/interaction data over one period.

use super::PeriodType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The derived metric fields of a period rollup.
///
/// Recomputation overwrites every field from the same deterministic window
/// query, so concurrent refreshes of the same period cannot corrupt a
/// summary, only repeat work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    /// Sessions whose start timestamp fell in the window.
    pub total_sessions: u64,
    /// Interactions whose timestamp fell in the window.
    pub total_interactions: u64,
    /// Distinct non-null user identifiers among in-window sessions.
    pub unique_users: u64,
    /// Mean closed-session duration in seconds; `None` when no in-window
    /// session has an end timestamp.
    pub avg_session_duration_seconds: Option<f64>,
    /// Mean interaction latency in milliseconds; `None` when no in-window
    /// interaction carries a latency.
    pub avg_response_time_ms: Option<f64>,
    /// Sum of products shown across in-window interactions.
    pub products_shown_count: u64,
    /// In-window interactions classified as product search.
    pub product_search_count: u64,
    /// In-window interactions whose success flag is `false`.
    pub error_count: u64,
    /// Intent label to occurrence count (null intents excluded).
    pub intent_distribution: BTreeMap<String, u64>,
    /// Error-kind label to occurrence count (null kinds excluded).
    pub error_distribution: BTreeMap<String, u64>,
    /// Session platform tag to occurrence count (null platforms excluded).
    pub platform_distribution: BTreeMap<String, u64>,
}

/// A cached rollup for one `(period start, period type)` bucket.
///
/// Summaries are created lazily on first request for a period and fully
/// overwritten on each subsequent aggregation call. There is no invalidation
/// signal; readers tolerate staleness between refreshes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    period_start: DateTime<Utc>,
    period_type: PeriodType,
    metrics: SummaryMetrics,
}

impl PeriodSummary {
    /// Creates a summary from freshly computed metrics.
    #[must_use]
    pub const fn new(
        period_start: DateTime<Utc>,
        period_type: PeriodType,
        metrics: SummaryMetrics,
    ) -> Self {
        Self {
            period_start,
            period_type,
            metrics,
        }
    }

    /// Returns the period start timestamp (the bucket key).
    #[must_use]
    pub const fn period_start(&self) -> DateTime<Utc> {
        self.period_start
    }

    /// Returns the period type (the bucket kind).
    #[must_use]
    pub const fn period_type(&self) -> PeriodType {
        self.period_type
    }

    /// Returns the derived metrics.
    #[must_use]
    pub const fn metrics(&self) -> &SummaryMetrics {
        &self.metrics
    }
}
