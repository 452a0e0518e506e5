//! Tests for analytics domain value types.

use chrono::Duration;
use rstest::rstest;

use super::helpers::{ManualClock, interaction, session, ts};
use crate::analytics::domain::{
    AnalyticsDomainError, Intent, PeriodType, Session, SessionId, SessionMetadata, TimeWindow,
};

#[rstest]
#[case("")]
#[case("   ")]
#[case("\t\n")]
fn session_id_rejects_blank_input(#[case] raw: &str) {
    let result = SessionId::new(raw);
    assert!(matches!(result, Err(AnalyticsDomainError::EmptySessionId)));
}

#[test]
fn session_id_preserves_raw_value() {
    let id = SessionId::new("session-42").expect("valid session id");
    assert_eq!(id.as_str(), "session-42");
}

#[test]
fn opening_a_session_reads_the_clock() {
    let now = ts(2025, 3, 10, 9, 0);
    let clock = ManualClock::at(now);
    let id = SessionId::new("s1").expect("valid session id");

    let session = Session::open(id, SessionMetadata::new().with_platform("web"), &clock);

    assert_eq!(session.start_time(), now);
    assert_eq!(session.platform(), Some("web"));
    assert!(!session.is_closed());
    assert_eq!(session.duration_seconds(), None);
}

#[test]
fn closing_is_a_one_way_transition() {
    let clock = ManualClock::at(ts(2025, 3, 10, 9, 0));
    let id = SessionId::new("s1").expect("valid session id");
    let mut session = Session::open(id, SessionMetadata::new(), &clock);

    clock.set(ts(2025, 3, 10, 9, 10));
    assert!(session.close(&clock));
    assert_eq!(session.end_time(), Some(ts(2025, 3, 10, 9, 10)));

    clock.advance(Duration::hours(1));
    assert!(!session.close(&clock));
    assert_eq!(session.end_time(), Some(ts(2025, 3, 10, 9, 10)));
}

#[test]
fn duration_counts_fractional_seconds() {
    let start = ts(2025, 3, 10, 9, 0);
    let closed = session(
        "s1",
        None,
        None,
        start,
        Some(start + Duration::milliseconds(90_500)),
    );
    assert_eq!(closed.duration_seconds(), Some(90.5));
}

#[rstest]
#[case(Intent::ProductSearch, "product_search")]
#[case(Intent::ProductInfo, "product_info")]
#[case(Intent::OrderStatus, "order_status")]
#[case(Intent::Recommendations, "recommendations")]
#[case(Intent::GeneralQuestion, "general_question")]
#[case(Intent::Greeting, "greeting")]
#[case(Intent::Support, "support")]
#[case(Intent::PriceInquiry, "price_inquiry")]
#[case(Intent::Comparison, "comparison")]
#[case(Intent::CheckoutHelp, "checkout_help")]
fn intent_labels_round_trip(#[case] intent: Intent, #[case] label: &str) {
    assert_eq!(intent.as_str(), label);
    assert_eq!(Intent::try_from(label).expect("known label"), intent);
}

#[test]
fn unknown_intent_label_is_rejected() {
    let result = Intent::try_from("haggling");
    assert!(matches!(
        result,
        Err(AnalyticsDomainError::UnknownIntent(label)) if label == "haggling"
    ));
}

#[rstest]
#[case(Some(0.0), Some(-1.0))]
#[case(Some(1.0), Some(1.0))]
#[case(Some(0.5), Some(0.0))]
#[case(None, None)]
fn scores_within_range_pass_validation(
    #[case] confidence: Option<f64>,
    #[case] sentiment: Option<f64>,
) {
    let mut event = interaction("s1", ts(2025, 3, 10, 9, 0));
    event.confidence_score = confidence;
    event.sentiment_score = sentiment;
    assert!(event.validate().is_ok());
}

#[rstest]
#[case(-0.1)]
#[case(1.5)]
#[case(f64::NAN)]
fn out_of_range_confidence_is_rejected(#[case] score: f64) {
    let mut event = interaction("s1", ts(2025, 3, 10, 9, 0));
    event.confidence_score = Some(score);
    assert!(matches!(
        event.validate(),
        Err(AnalyticsDomainError::ConfidenceOutOfRange(_))
    ));
}

#[rstest]
#[case(-1.1)]
#[case(2.0)]
fn out_of_range_sentiment_is_rejected(#[case] score: f64) {
    let mut event = interaction("s1", ts(2025, 3, 10, 9, 0));
    event.sentiment_score = Some(score);
    assert!(matches!(
        event.validate(),
        Err(AnalyticsDomainError::SentimentOutOfRange(_))
    ));
}

#[rstest]
#[case(PeriodType::Daily, ts(2025, 3, 11, 0, 0))]
#[case(PeriodType::Weekly, ts(2025, 3, 17, 0, 0))]
#[case(PeriodType::Monthly, ts(2025, 4, 10, 0, 0))]
fn period_windows_span_their_calendar_length(
    #[case] period_type: PeriodType,
    #[case] expected_end: chrono::DateTime<chrono::Utc>,
) {
    let start = ts(2025, 3, 10, 0, 0);
    let window = period_type.window(start);
    assert_eq!(window.start(), start);
    assert_eq!(window.end(), expected_end);
}

#[test]
fn window_includes_start_and_excludes_end() {
    let window = TimeWindow::new(ts(2025, 3, 10, 0, 0), ts(2025, 3, 11, 0, 0));
    assert!(window.contains(ts(2025, 3, 10, 0, 0)));
    assert!(window.contains(ts(2025, 3, 10, 23, 59)));
    assert!(!window.contains(ts(2025, 3, 11, 0, 0)));
    assert!(!window.contains(ts(2025, 3, 9, 23, 59)));
}
