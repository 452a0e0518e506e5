//! Tests for period rollup aggregation.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::helpers::{interaction, session, stores, ts};
use crate::analytics::{
    domain::{Intent, PeriodType},
    ports::{EventStore, SummaryStore},
    services::SummaryService,
};

/// Seeds a representative day of traffic: three in-window sessions (one
/// still open, one anonymous) and three in-window interactions, plus one
/// session and one interaction on the next day.
async fn seed_busy_day(events: &Arc<crate::analytics::adapters::memory::InMemoryEventStore>) {
    let rows = [
        session(
            "s1",
            Some("u1"),
            Some("web"),
            ts(2025, 3, 10, 9, 0),
            Some(ts(2025, 3, 10, 9, 10)),
        ),
        session("s2", Some("u2"), Some("web"), ts(2025, 3, 10, 10, 0), None),
        session(
            "s3",
            None,
            Some("ios"),
            ts(2025, 3, 10, 11, 0),
            Some(ts(2025, 3, 10, 11, 5)),
        ),
        session("s4", Some("u3"), Some("web"), ts(2025, 3, 11, 1, 0), None),
    ];
    for row in rows {
        events.insert_session(&row).await.expect("insert succeeds");
    }

    let mut greeting = interaction("s1", ts(2025, 3, 10, 9, 1));
    greeting.detected_intent = Some(Intent::Greeting);
    greeting.response_time_ms = Some(100);

    let mut search = interaction("s1", ts(2025, 3, 10, 9, 5));
    search.detected_intent = Some(Intent::ProductSearch);
    search.response_time_ms = Some(300);
    search.products_shown = 2;

    let mut failed_search = interaction("s2", ts(2025, 3, 10, 10, 15));
    failed_search.detected_intent = Some(Intent::ProductSearch);
    failed_search.was_successful = false;
    failed_search.error_type = Some("catalog".to_owned());

    let next_day = interaction("s4", ts(2025, 3, 11, 1, 5));

    for event in [greeting, search, failed_search, next_day] {
        events
            .insert_interaction(&event)
            .await
            .expect("insert succeeds");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn rollup_derives_every_metric_from_the_window() {
    let (events, summaries) = stores();
    seed_busy_day(&events).await;
    let service = SummaryService::new(Arc::clone(&events), Arc::clone(&summaries));

    let summary = service
        .generate_summary(ts(2025, 3, 10, 0, 0), PeriodType::Daily)
        .await
        .expect("generation succeeds");

    let m = summary.metrics();
    assert_eq!(m.total_sessions, 3);
    assert_eq!(m.total_interactions, 3);
    assert_eq!(m.unique_users, 2);
    assert_eq!(m.avg_session_duration_seconds, Some(450.0));
    assert_eq!(m.avg_response_time_ms, Some(200.0));
    assert_eq!(m.products_shown_count, 2);
    assert_eq!(m.product_search_count, 2);
    assert_eq!(m.error_count, 1);
    assert_eq!(
        m.intent_distribution,
        BTreeMap::from([("greeting".to_owned(), 1), ("product_search".to_owned(), 2)])
    );
    assert_eq!(
        m.error_distribution,
        BTreeMap::from([("catalog".to_owned(), 1)])
    );
    assert_eq!(
        m.platform_distribution,
        BTreeMap::from([("ios".to_owned(), 1), ("web".to_owned(), 2)])
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn rollup_overwrite_is_deterministic() {
    let (events, summaries) = stores();
    seed_busy_day(&events).await;
    let service = SummaryService::new(Arc::clone(&events), Arc::clone(&summaries));

    let first = service
        .generate_summary(ts(2025, 3, 10, 0, 0), PeriodType::Daily)
        .await
        .expect("first generation succeeds");
    let second = service
        .generate_summary(ts(2025, 3, 10, 0, 0), PeriodType::Daily)
        .await
        .expect("second generation succeeds");

    assert_eq!(first, second);

    let stored = summaries
        .find(ts(2025, 3, 10, 0, 0), PeriodType::Daily)
        .await
        .expect("lookup succeeds")
        .expect("summary was stored");
    assert_eq!(stored, second);
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_window_yields_zeroes_and_null_averages() {
    let (events, summaries) = stores();
    let service = SummaryService::new(events, summaries);

    let summary = service
        .generate_summary(ts(2025, 3, 10, 0, 0), PeriodType::Daily)
        .await
        .expect("generation succeeds");

    let m = summary.metrics();
    assert_eq!(m.total_sessions, 0);
    assert_eq!(m.total_interactions, 0);
    assert_eq!(m.unique_users, 0);
    assert_eq!(m.avg_session_duration_seconds, None);
    assert_eq!(m.avg_response_time_ms, None);
    assert!(m.intent_distribution.is_empty());
    assert!(m.error_distribution.is_empty());
    assert!(m.platform_distribution.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn latency_average_ignores_interactions_without_latency() {
    let (events, summaries) = stores();

    let mut with_latency = interaction("s1", ts(2025, 3, 10, 9, 0));
    with_latency.response_time_ms = Some(500);
    let without_latency = interaction("s1", ts(2025, 3, 10, 9, 1));
    for event in [with_latency, without_latency] {
        events
            .insert_interaction(&event)
            .await
            .expect("insert succeeds");
    }

    let service = SummaryService::new(events, summaries);
    let summary = service
        .generate_summary(ts(2025, 3, 10, 0, 0), PeriodType::Daily)
        .await
        .expect("generation succeeds");

    assert_eq!(summary.metrics().total_interactions, 2);
    assert_eq!(summary.metrics().avg_response_time_ms, Some(500.0));
}

#[tokio::test(flavor = "multi_thread")]
async fn window_boundaries_are_half_open() {
    let (events, summaries) = stores();

    let at_start = interaction("s1", ts(2025, 3, 10, 0, 0));
    let at_end = interaction("s1", ts(2025, 3, 11, 0, 0));
    for event in [at_start, at_end] {
        events
            .insert_interaction(&event)
            .await
            .expect("insert succeeds");
    }

    let service = SummaryService::new(events, summaries);
    let summary = service
        .generate_summary(ts(2025, 3, 10, 0, 0), PeriodType::Daily)
        .await
        .expect("generation succeeds");

    assert_eq!(summary.metrics().total_interactions, 1);
}
