//! Shared fixtures for analytics unit tests.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::analytics::{
    adapters::memory::{InMemoryEventStore, InMemorySummaryStore},
    domain::{EntityMap, NewInteraction, PersistedSessionData, Session, SessionId},
    services::EventRecorder,
};

pub use crate::testing::{ManualClock, ts};

/// Recorder over fresh in-memory storage and a manual clock.
pub fn recorder_at(
    now: DateTime<Utc>,
) -> (
    EventRecorder<InMemoryEventStore, ManualClock>,
    Arc<InMemoryEventStore>,
    ManualClock,
) {
    let store = Arc::new(InMemoryEventStore::new());
    let clock = ManualClock::at(now);
    let recorder = EventRecorder::new(Arc::clone(&store), Arc::new(clock.clone()));
    (recorder, store, clock)
}

/// Fresh in-memory store pair for aggregation tests.
pub fn stores() -> (Arc<InMemoryEventStore>, Arc<InMemorySummaryStore>) {
    (
        Arc::new(InMemoryEventStore::new()),
        Arc::new(InMemorySummaryStore::new()),
    )
}

/// Builds a session row directly, bypassing the recorder.
pub fn session(
    id: &str,
    user_id: Option<&str>,
    platform: Option<&str>,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
) -> Session {
    Session::from_persisted(PersistedSessionData {
        session_id: SessionId::new(id).expect("valid session id"),
        user_id: user_id.map(ToOwned::to_owned),
        start_time: start,
        end_time: end,
        platform: platform.map(ToOwned::to_owned),
        device_info: None,
    })
}

/// Builds an interaction event with the fields aggregation cares about.
pub fn interaction(
    session_id: &str,
    timestamp: DateTime<Utc>,
) -> NewInteraction {
    NewInteraction {
        session_id: SessionId::new(session_id).expect("valid session id"),
        timestamp,
        user_message: "hello".to_owned(),
        chatbot_response: None,
        detected_intent: None,
        confidence_score: None,
        has_attachment: false,
        attachment_type: None,
        response_time_ms: None,
        products_shown: 0,
        entities: None,
        sentiment_score: None,
        was_successful: true,
        error_type: None,
    }
}

/// Entity map with a single `product` key.
pub fn product_entities(product: &str) -> EntityMap {
    let mut entities = EntityMap::new();
    entities.insert(
        "product".to_owned(),
        serde_json::Value::String(product.to_owned()),
    );
    entities
}
