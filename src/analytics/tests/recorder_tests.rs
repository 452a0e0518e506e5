//! Tests for the event recording service.

use chrono::Duration;

use super::helpers::{recorder_at, ts};
use crate::analytics::{
    domain::{AnalyticsDomainError, Intent, SessionId},
    ports::EventStore,
    services::{OpenSessionRequest, RecordInteractionRequest, RecorderError},
};

#[tokio::test(flavor = "multi_thread")]
async fn open_session_is_idempotent() {
    let t0 = ts(2025, 3, 10, 9, 0);
    let (recorder, _store, clock) = recorder_at(t0);

    let first = recorder
        .open_session(OpenSessionRequest::new("s1").with_user_id("u1").with_platform("web"))
        .await
        .expect("first open succeeds");

    clock.advance(Duration::minutes(5));
    let second = recorder
        .open_session(OpenSessionRequest::new("s1").with_user_id("someone-else"))
        .await
        .expect("second open succeeds");

    assert_eq!(second, first);
    assert_eq!(second.start_time(), t0);
    assert_eq!(second.user_id(), Some("u1"));
    assert_eq!(second.platform(), Some("web"));
}

#[tokio::test(flavor = "multi_thread")]
async fn open_session_rejects_blank_identifier() {
    let (recorder, _store, _clock) = recorder_at(ts(2025, 3, 10, 9, 0));

    let result = recorder.open_session(OpenSessionRequest::new("  ")).await;
    assert!(matches!(result, Err(RecorderError::Domain(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn close_session_sets_end_time_once() {
    let (recorder, _store, clock) = recorder_at(ts(2025, 3, 10, 9, 0));
    recorder
        .open_session(OpenSessionRequest::new("s1"))
        .await
        .expect("open succeeds");

    let t_close = ts(2025, 3, 10, 9, 10);
    clock.set(t_close);
    let closed = recorder
        .close_session("s1")
        .await
        .expect("close succeeds")
        .expect("session exists");
    assert_eq!(closed.end_time(), Some(t_close));

    clock.advance(Duration::hours(1));
    let again = recorder
        .close_session("s1")
        .await
        .expect("second close succeeds")
        .expect("session still exists");
    assert_eq!(again.end_time(), Some(t_close));
}

#[tokio::test(flavor = "multi_thread")]
async fn close_session_reports_unknown_identifier_as_none() {
    let (recorder, _store, _clock) = recorder_at(ts(2025, 3, 10, 9, 0));

    let result = recorder.close_session("ghost").await.expect("close succeeds");
    assert_eq!(result, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn record_interaction_auto_provisions_a_bare_session() {
    let t0 = ts(2025, 3, 10, 9, 0);
    let (recorder, store, _clock) = recorder_at(t0);

    let interaction = recorder
        .record_interaction(
            RecordInteractionRequest::new("ghost", "is anyone there?")
                .with_intent(Intent::GeneralQuestion, 0.7),
        )
        .await
        .expect("recording succeeds");

    assert_eq!(interaction.session_id().as_str(), "ghost");
    assert_eq!(interaction.detected_intent(), Some(Intent::GeneralQuestion));

    let session_id = SessionId::new("ghost").expect("valid session id");
    let session = store
        .find_session(&session_id)
        .await
        .expect("lookup succeeds")
        .expect("session was provisioned");
    assert_eq!(session.start_time(), t0);
    assert_eq!(session.user_id(), None);
    assert_eq!(session.platform(), None);
    assert!(!session.is_closed());
}

#[tokio::test(flavor = "multi_thread")]
async fn record_interaction_captures_telemetry_fields() {
    let (recorder, _store, clock) = recorder_at(ts(2025, 3, 10, 9, 0));
    recorder
        .open_session(OpenSessionRequest::new("s1"))
        .await
        .expect("open succeeds");

    let t1 = ts(2025, 3, 10, 9, 1);
    clock.set(t1);
    let interaction = recorder
        .record_interaction(
            RecordInteractionRequest::new("s1", "show me headphones")
                .with_response("Here are some headphones.")
                .with_intent(Intent::ProductSearch, 0.92)
                .with_response_time_ms(340)
                .with_products_shown(3),
        )
        .await
        .expect("recording succeeds");

    let event = interaction.event();
    assert_eq!(event.timestamp, t1);
    assert_eq!(event.chatbot_response.as_deref(), Some("Here are some headphones."));
    assert_eq!(event.confidence_score, Some(0.92));
    assert_eq!(event.response_time_ms, Some(340));
    assert_eq!(event.products_shown, 3);
    assert!(event.was_successful);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_interactions_carry_an_error_kind() {
    let (recorder, _store, _clock) = recorder_at(ts(2025, 3, 10, 9, 0));

    let interaction = recorder
        .record_interaction(RecordInteractionRequest::new("s1", "where is my order").failed("catalog"))
        .await
        .expect("recording succeeds");

    assert!(!interaction.event().was_successful);
    assert_eq!(interaction.event().error_type.as_deref(), Some("catalog"));
}

#[tokio::test(flavor = "multi_thread")]
async fn record_interaction_stores_an_in_range_sentiment() {
    let (recorder, _store, _clock) = recorder_at(ts(2025, 3, 10, 9, 0));

    let interaction = recorder
        .record_interaction(
            RecordInteractionRequest::new("s1", "this arrived broken").with_sentiment(-0.25),
        )
        .await
        .expect("recording succeeds");

    assert_eq!(interaction.event().sentiment_score, Some(-0.25));
}

#[tokio::test(flavor = "multi_thread")]
async fn record_interaction_rejects_out_of_range_confidence() {
    let (recorder, store, _clock) = recorder_at(ts(2025, 3, 10, 9, 0));

    let result = recorder
        .record_interaction(
            RecordInteractionRequest::new("s1", "hi").with_intent(Intent::Greeting, 1.5),
        )
        .await;
    assert!(matches!(
        result,
        Err(RecorderError::Domain(
            AnalyticsDomainError::ConfidenceOutOfRange(_)
        ))
    ));

    // The rejected event must not have provisioned a session either.
    let session_id = SessionId::new("s1").expect("valid session id");
    let session = store.find_session(&session_id).await.expect("lookup succeeds");
    assert_eq!(session, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn record_interaction_rejects_out_of_range_sentiment() {
    let (recorder, _store, _clock) = recorder_at(ts(2025, 3, 10, 9, 0));

    let result = recorder
        .record_interaction(
            RecordInteractionRequest::new("s1", "awful experience").with_sentiment(-3.0),
        )
        .await;
    assert!(matches!(
        result,
        Err(RecorderError::Domain(
            AnalyticsDomainError::SentimentOutOfRange(_)
        ))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn recent_interactions_returns_last_n_oldest_first() {
    let (recorder, _store, clock) = recorder_at(ts(2025, 3, 10, 9, 0));

    for n in 0..5 {
        clock.set(ts(2025, 3, 10, 9, n));
        recorder
            .record_interaction(RecordInteractionRequest::new("s1", format!("message {n}")))
            .await
            .expect("recording succeeds");
    }

    let recent = recorder
        .recent_interactions("s1", 3)
        .await
        .expect("lookup succeeds");
    let messages: Vec<&str> = recent.iter().map(|i| i.event().user_message.as_str()).collect();
    assert_eq!(messages, ["message 2", "message 3", "message 4"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn recent_sessions_orders_by_start_time_with_counts() {
    let (recorder, _store, clock) = recorder_at(ts(2025, 3, 10, 9, 0));
    recorder
        .open_session(OpenSessionRequest::new("older"))
        .await
        .expect("open succeeds");

    clock.set(ts(2025, 3, 10, 10, 0));
    recorder
        .open_session(OpenSessionRequest::new("newer"))
        .await
        .expect("open succeeds");
    for _ in 0..2 {
        recorder
            .record_interaction(RecordInteractionRequest::new("newer", "hi"))
            .await
            .expect("recording succeeds");
    }

    let activity = recorder.recent_sessions(5).await.expect("lookup succeeds");
    assert_eq!(activity.len(), 2);
    assert_eq!(activity[0].session.session_id().as_str(), "newer");
    assert_eq!(activity[0].interaction_count, 2);
    assert_eq!(activity[1].session.session_id().as_str(), "older");
    assert_eq!(activity[1].interaction_count, 0);

    let limited = recorder.recent_sessions(1).await.expect("lookup succeeds");
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].session.session_id().as_str(), "newer");
}
