//! End-to-end exercise of the analytics pipeline through the public API:
//! record sessions and interactions, aggregate a daily rollup, and compose
//! a dashboard report from it.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use std::sync::{Arc, PoisonError, RwLock};

use vitrine::analytics::{
    adapters::memory::{InMemoryEventStore, InMemorySummaryStore},
    domain::Intent,
    services::{DashboardService, EventRecorder, OpenSessionRequest, RecordInteractionRequest},
};

#[derive(Debug, Clone)]
struct ManualClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl ManualClock {
    fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    fn set(&self, now: DateTime<Utc>) {
        *self.now.write().unwrap_or_else(PoisonError::into_inner) = now;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(PoisonError::into_inner)
    }
}

fn ts(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

fn product_entities(product: &str) -> vitrine::analytics::domain::EntityMap {
    let mut entities = vitrine::analytics::domain::EntityMap::new();
    entities.insert(
        "product".to_owned(),
        serde_json::Value::String(product.to_owned()),
    );
    entities
}

#[tokio::test(flavor = "multi_thread")]
async fn recorded_traffic_flows_into_the_dashboard_report() {
    let events = Arc::new(InMemoryEventStore::new());
    let summaries = Arc::new(InMemorySummaryStore::new());
    let clock = Arc::new(ManualClock::at(ts(2025, 3, 10, 9, 0)));
    let recorder = EventRecorder::new(Arc::clone(&events), Arc::clone(&clock));

    // A shopper session with two exchanges.
    recorder
        .open_session(OpenSessionRequest::new("s1").with_user_id("u1").with_platform("web"))
        .await
        .expect("open succeeds");
    recorder
        .record_interaction(
            RecordInteractionRequest::new("s1", "hi")
                .with_response("Hello! How can I help with your shopping today?")
                .with_intent(Intent::Greeting, 0.95)
                .with_response_time_ms(120),
        )
        .await
        .expect("recording succeeds");
    recorder
        .record_interaction(
            RecordInteractionRequest::new("s1", "show me headphones")
                .with_response("I found the following products matching 'headphones':")
                .with_intent(Intent::ProductSearch, 0.9)
                .with_response_time_ms(240)
                .with_products_shown(2)
                .with_entities(product_entities("Wireless Headphones")),
        )
        .await
        .expect("recording succeeds");
    clock.set(ts(2025, 3, 10, 9, 10));
    recorder
        .close_session("s1")
        .await
        .expect("close succeeds")
        .expect("session exists");

    // A second, anonymous session whose one exchange failed.
    clock.set(ts(2025, 3, 10, 11, 0));
    recorder
        .record_interaction(
            RecordInteractionRequest::new("s2", "where is my order")
                .with_intent(Intent::ProductSearch, 0.6)
                .failed("catalog"),
        )
        .await
        .expect("recording succeeds");

    // Next morning, ask for yesterday's dashboard.
    clock.set(ts(2025, 3, 11, 6, 0));
    let dashboard = DashboardService::new(events, summaries, clock);
    let report = dashboard.dashboard(1).await.expect("report succeeds");

    assert_eq!(report.totals.sessions, 2);
    assert_eq!(report.totals.interactions, 3);
    assert_eq!(report.totals.products_shown, 2);
    assert_eq!(report.totals.errors, 1);

    assert_eq!(report.averages.session_duration_seconds, 600.0);
    assert_eq!(report.averages.response_time_ms, 180.0);
    assert_eq!(report.averages.interactions_per_session, 1.5);

    assert_eq!(report.daily_trends.len(), 1);
    let day = &report.daily_trends[0];
    assert_eq!(
        day.date,
        NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date")
    );
    assert_eq!(day.sessions, 2);
    assert_eq!(day.interactions, 3);
    assert_eq!(day.error_count, 1);

    assert_eq!(report.intent_distribution.get("greeting"), Some(&1));
    assert_eq!(report.intent_distribution.get("product_search"), Some(&2));

    assert_eq!(report.top_products.len(), 1);
    assert_eq!(report.top_products[0].product, "Wireless Headphones");
    assert_eq!(report.top_products[0].count, 1);
}
