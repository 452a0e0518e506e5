//! Dashboard query service: rolling multi-day reports with on-demand
//! backfill of missing daily rollups.

use super::{SummaryService, SummaryServiceError};
use crate::analytics::{
    domain::{
        DailyTrend, DashboardReport, PeriodSummary, PeriodType, ReportAverages, ReportPeriod,
        ReportTotals, TimeWindow, TopProduct,
    },
    ports::{EventStore, EventStoreError, SummaryStore, SummaryStoreError},
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use mockable::Clock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Number of top products reported.
const TOP_PRODUCT_LIMIT: usize = 5;

/// Service-level errors for dashboard composition.
#[derive(Debug, Error)]
pub enum DashboardServiceError {
    /// Event store scan failed.
    #[error(transparent)]
    Events(#[from] EventStoreError),
    /// Summary lookup failed.
    #[error(transparent)]
    Summaries(#[from] SummaryStoreError),
}

/// Result type for dashboard composition.
pub type DashboardServiceResult<T> = Result<T, DashboardServiceError>;

/// Composes rolling N-day reports from daily rollups.
///
/// The service only reads summaries; generating a missing day's rollup via
/// the aggregator is its one side effect.
#[derive(Clone)]
pub struct DashboardService<E, S, C>
where
    E: EventStore,
    S: SummaryStore,
    C: Clock + Send + Sync,
{
    events: Arc<E>,
    summaries: Arc<S>,
    aggregator: SummaryService<E, S>,
    clock: Arc<C>,
}

impl<E, S, C> DashboardService<E, S, C>
where
    E: EventStore,
    S: SummaryStore,
    C: Clock + Send + Sync,
{
    /// Creates a new dashboard service over the given stores.
    #[must_use]
    pub fn new(events: Arc<E>, summaries: Arc<S>, clock: Arc<C>) -> Self {
        let aggregator = SummaryService::new(Arc::clone(&events), Arc::clone(&summaries));
        Self {
            events,
            summaries,
            aggregator,
            clock,
        }
    }

    /// Builds the report for the last `days` calendar days.
    ///
    /// Missing daily rollups are generated on demand; a day whose
    /// aggregation fails is logged and omitted from the trend rather than
    /// failing the whole report.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardServiceError`] when loading summaries or scanning
    /// interactions fails outright.
    pub async fn dashboard(&self, days: u32) -> DashboardServiceResult<DashboardReport> {
        let end = self.clock.utc();
        let start = end - Duration::days(i64::from(days));

        self.backfill_missing_days(start, end, days).await?;

        let summaries = self
            .summaries
            .find_in_range(midnight(start.date_naive()), end, PeriodType::Daily)
            .await?;

        let totals = sum_totals(&summaries);
        let averages = compute_averages(&summaries, &totals);
        let intent_distribution = merge_intent_distributions(&summaries);
        let daily_trends = build_trends(&summaries);
        let top_products = self.top_products(start, end).await?;

        Ok(DashboardReport {
            period: ReportPeriod { start, end, days },
            totals,
            averages,
            intent_distribution,
            daily_trends,
            top_products,
        })
    }

    /// Generates daily rollups for calendar dates in the window that have
    /// none yet. Each day is independent; failures are skipped.
    async fn backfill_missing_days(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        days: u32,
    ) -> DashboardServiceResult<()> {
        let existing = self
            .summaries
            .find_in_range(midnight(start.date_naive()), end, PeriodType::Daily)
            .await?;
        let have: BTreeSet<NaiveDate> = existing
            .iter()
            .map(|s| s.period_start().date_naive())
            .collect();

        for offset in 0..days {
            let date = (start + Duration::days(i64::from(offset))).date_naive();
            if have.contains(&date) {
                continue;
            }
            if let Err(err) = self
                .aggregator
                .generate_summary(midnight(date), PeriodType::Daily)
                .await
            {
                log_skipped_day(date, &err);
            }
        }
        Ok(())
    }

    /// Ranks products named in product-showing interactions over the window.
    ///
    /// Ties break by product name ascending so the ranking is deterministic.
    async fn top_products(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DashboardServiceResult<Vec<TopProduct>> {
        let interactions = self
            .events
            .interactions_in(&TimeWindow::new(start, end))
            .await?;

        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for interaction in &interactions {
            if interaction.event().products_shown == 0 {
                continue;
            }
            if let Some(product) = interaction.product_entity() {
                *counts.entry(product.to_owned()).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<TopProduct> = counts
            .into_iter()
            .map(|(product, count)| TopProduct { product, count })
            .collect();
        // BTreeMap iteration is name-ascending; the stable sort keeps that
        // order inside equal counts.
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(TOP_PRODUCT_LIMIT);
        Ok(ranked)
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn log_skipped_day(date: NaiveDate, err: &SummaryServiceError) {
    warn!(%date, error = %err, "skipping day with failed summary generation");
}

fn sum_totals(summaries: &[PeriodSummary]) -> ReportTotals {
    summaries
        .iter()
        .map(PeriodSummary::metrics)
        .fold(ReportTotals::default(), |acc, m| ReportTotals {
            sessions: acc.sessions + m.total_sessions,
            interactions: acc.interactions + m.total_interactions,
            products_shown: acc.products_shown + m.products_shown_count,
            errors: acc.errors + m.error_count,
        })
}

/// Unweighted average of per-day averages; a day with no qualifying average
/// counts as zero. Sparse windows bias downward; preserved as-is from the
/// reference system.
fn compute_averages(summaries: &[PeriodSummary], totals: &ReportTotals) -> ReportAverages {
    let day_count = summaries.len().max(1) as f64;
    let session_duration_seconds = summaries
        .iter()
        .map(|s| s.metrics().avg_session_duration_seconds.unwrap_or(0.0))
        .sum::<f64>()
        / day_count;
    let response_time_ms = summaries
        .iter()
        .map(|s| s.metrics().avg_response_time_ms.unwrap_or(0.0))
        .sum::<f64>()
        / day_count;
    let interactions_per_session = if totals.sessions == 0 {
        0.0
    } else {
        totals.interactions as f64 / totals.sessions as f64
    };

    ReportAverages {
        session_duration_seconds,
        response_time_ms,
        interactions_per_session,
    }
}

fn merge_intent_distributions(summaries: &[PeriodSummary]) -> BTreeMap<String, u64> {
    let mut merged: BTreeMap<String, u64> = BTreeMap::new();
    for summary in summaries {
        for (intent, count) in &summary.metrics().intent_distribution {
            *merged.entry(intent.clone()).or_insert(0) += count;
        }
    }
    merged
}

fn build_trends(summaries: &[PeriodSummary]) -> Vec<DailyTrend> {
    summaries
        .iter()
        .map(|summary| {
            let m = summary.metrics();
            DailyTrend {
                date: summary.period_start().date_naive(),
                sessions: m.total_sessions,
                interactions: m.total_interactions,
                avg_duration_seconds: m.avg_session_duration_seconds.unwrap_or(0.0),
                avg_response_time_ms: m.avg_response_time_ms.unwrap_or(0.0),
                error_count: m.error_count,
            }
        })
        .collect()
}
