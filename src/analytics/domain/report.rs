//! Dashboard report types composed from daily rollups.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bounds of the rolling window a dashboard report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    /// Window start (now minus `days`).
    pub start: DateTime<Utc>,
    /// Window end (the time the report was requested).
    pub end: DateTime<Utc>,
    /// Number of calendar days requested.
    pub days: u32,
}

/// Summed totals across the loaded daily summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTotals {
    /// Total sessions in the window.
    pub sessions: u64,
    /// Total interactions in the window.
    pub interactions: u64,
    /// Total products shown in the window.
    pub products_shown: u64,
    /// Total failed interactions in the window.
    pub errors: u64,
}

/// Averages across the loaded daily summaries.
///
/// Duration and response time are unweighted averages of the per-day
/// averages, with a day's missing average counted as zero. That biases sparse
/// windows downward; the behaviour is preserved as-is from the reference
/// system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportAverages {
    /// Mean of per-day average session durations, in seconds.
    pub session_duration_seconds: f64,
    /// Mean of per-day average response latencies, in milliseconds.
    pub response_time_ms: f64,
    /// Total interactions divided by total sessions; zero when the window
    /// has no sessions.
    pub interactions_per_session: f64,
}

/// One chronological per-day entry in the dashboard trend list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTrend {
    /// Calendar date of the summarised day.
    pub date: NaiveDate,
    /// Sessions started that day.
    pub sessions: u64,
    /// Interactions recorded that day.
    pub interactions: u64,
    /// Average session duration in seconds, zero when absent.
    pub avg_duration_seconds: f64,
    /// Average response latency in milliseconds, zero when absent.
    pub avg_response_time_ms: f64,
    /// Failed interactions that day.
    pub error_count: u64,
}

/// One entry in the top-products ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopProduct {
    /// Product name taken from the interaction entity map.
    pub product: String,
    /// Number of product-showing interactions naming it.
    pub count: u64,
}

/// A rolling multi-day dashboard report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    /// Window bounds.
    pub period: ReportPeriod,
    /// Summed totals.
    pub totals: ReportTotals,
    /// Window averages.
    pub averages: ReportAverages,
    /// Intent label to count, merged across days by per-key summation.
    pub intent_distribution: BTreeMap<String, u64>,
    /// Chronological per-day trend entries.
    pub daily_trends: Vec<DailyTrend>,
    /// Top products by occurrence count, at most five entries.
    pub top_products: Vec<TopProduct>,
}
