//! Diesel row models and conversions for analytics persistence.

use super::schema::{analytics_summaries, chat_interactions, chat_sessions};
use crate::analytics::domain::{
    EntityMap, Intent, Interaction, InteractionId, NewInteraction, PeriodSummary, PeriodType,
    PersistedSessionData, Session, SessionId, SummaryMetrics,
};
use crate::analytics::ports::{EventStoreError, EventStoreResult, SummaryStoreResult};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Query result row for chat session records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = chat_sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SessionRow {
    /// Surrogate row identifier.
    pub id: i64,
    /// Externally supplied session identifier.
    pub session_id: String,
    /// Shopper's user identifier.
    pub user_id: Option<String>,
    /// Session start timestamp.
    pub start_time: DateTime<Utc>,
    /// Session end timestamp.
    pub end_time: Option<DateTime<Utc>>,
    /// Platform tag.
    pub platform: Option<String>,
    /// Device descriptor.
    pub device_info: Option<String>,
}

/// Insert model for chat session records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chat_sessions)]
pub struct NewSessionRow {
    /// Externally supplied session identifier.
    pub session_id: String,
    /// Shopper's user identifier.
    pub user_id: Option<String>,
    /// Session start timestamp.
    pub start_time: DateTime<Utc>,
    /// Session end timestamp.
    pub end_time: Option<DateTime<Utc>>,
    /// Platform tag.
    pub platform: Option<String>,
    /// Device descriptor.
    pub device_info: Option<String>,
}

/// Query result row for interaction records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = chat_interactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InteractionRow {
    /// Auto-assigned interaction identifier.
    pub id: i64,
    /// Owning session identifier.
    pub session_id: String,
    /// Recording timestamp.
    pub timestamp: DateTime<Utc>,
    /// The shopper's message text.
    pub user_message: String,
    /// The assistant's reply text.
    pub chatbot_response: Option<String>,
    /// Detected intent label.
    pub detected_intent: Option<String>,
    /// Classification confidence.
    pub confidence_score: Option<f64>,
    /// Attachment flag.
    pub has_attachment: bool,
    /// Attachment kind.
    pub attachment_type: Option<String>,
    /// Reply latency in milliseconds.
    pub response_time_ms: Option<i64>,
    /// Products shown in the reply.
    pub products_shown: i64,
    /// Entity map payload.
    pub entities: Option<Value>,
    /// Sentiment score.
    pub sentiment_score: Option<f64>,
    /// Success flag.
    pub was_successful: bool,
    /// Error-kind label.
    pub error_type: Option<String>,
}

/// Insert model for interaction records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chat_interactions)]
pub struct NewInteractionRow {
    /// Owning session identifier.
    pub session_id: String,
    /// Recording timestamp.
    pub timestamp: DateTime<Utc>,
    /// The shopper's message text.
    pub user_message: String,
    /// The assistant's reply text.
    pub chatbot_response: Option<String>,
    /// Detected intent label.
    pub detected_intent: Option<String>,
    /// Classification confidence.
    pub confidence_score: Option<f64>,
    /// Attachment flag.
    pub has_attachment: bool,
    /// Attachment kind.
    pub attachment_type: Option<String>,
    /// Reply latency in milliseconds.
    pub response_time_ms: Option<i64>,
    /// Products shown in the reply.
    pub products_shown: i64,
    /// Entity map payload.
    pub entities: Option<Value>,
    /// Sentiment score.
    pub sentiment_score: Option<f64>,
    /// Success flag.
    pub was_successful: bool,
    /// Error-kind label.
    pub error_type: Option<String>,
}

/// Query result row for analytics summary records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = analytics_summaries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SummaryRow {
    /// Surrogate row identifier.
    pub id: i64,
    /// Period start timestamp.
    pub date: DateTime<Utc>,
    /// Period type label.
    pub period_type: String,
    /// Sessions started in the period.
    pub total_sessions: i64,
    /// Interactions recorded in the period.
    pub total_interactions: i64,
    /// Distinct non-null users.
    pub unique_users: i64,
    /// Mean closed-session duration in seconds.
    pub avg_session_duration_seconds: Option<f64>,
    /// Mean interaction latency in milliseconds.
    pub avg_response_time_ms: Option<f64>,
    /// Sum of products shown.
    pub products_shown_count: i64,
    /// Product-search interaction count.
    pub product_search_count: i64,
    /// Failed interaction count.
    pub error_count: i64,
    /// Intent distribution payload.
    pub intent_distribution: Value,
    /// Error-kind distribution payload.
    pub error_distribution: Value,
    /// Platform distribution payload.
    pub platform_distribution: Value,
}

/// Insert/overwrite model for analytics summary records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = analytics_summaries)]
pub struct NewSummaryRow {
    /// Period start timestamp.
    pub date: DateTime<Utc>,
    /// Period type label.
    pub period_type: String,
    /// Sessions started in the period.
    pub total_sessions: i64,
    /// Interactions recorded in the period.
    pub total_interactions: i64,
    /// Distinct non-null users.
    pub unique_users: i64,
    /// Mean closed-session duration in seconds.
    pub avg_session_duration_seconds: Option<f64>,
    /// Mean interaction latency in milliseconds.
    pub avg_response_time_ms: Option<f64>,
    /// Sum of products shown.
    pub products_shown_count: i64,
    /// Product-search interaction count.
    pub product_search_count: i64,
    /// Failed interaction count.
    pub error_count: i64,
    /// Intent distribution payload.
    pub intent_distribution: Value,
    /// Error-kind distribution payload.
    pub error_distribution: Value,
    /// Platform distribution payload.
    pub platform_distribution: Value,
}

/// Builds an insert row from a session aggregate.
pub fn session_to_new_row(session: &Session) -> NewSessionRow {
    NewSessionRow {
        session_id: session.session_id().as_str().to_owned(),
        user_id: session.user_id().map(ToOwned::to_owned),
        start_time: session.start_time(),
        end_time: session.end_time(),
        platform: session.platform().map(ToOwned::to_owned),
        device_info: session.device_info().map(ToOwned::to_owned),
    }
}

/// Reconstructs a session aggregate from a persisted row.
pub fn row_to_session(row: SessionRow) -> EventStoreResult<Session> {
    let session_id =
        SessionId::new(row.session_id).map_err(EventStoreError::invalid_persisted_data)?;
    Ok(Session::from_persisted(PersistedSessionData {
        session_id,
        user_id: row.user_id,
        start_time: row.start_time,
        end_time: row.end_time,
        platform: row.platform,
        device_info: row.device_info,
    }))
}

/// Builds an insert row from an interaction event.
pub fn interaction_to_new_row(event: &NewInteraction) -> NewInteractionRow {
    NewInteractionRow {
        session_id: event.session_id.as_str().to_owned(),
        timestamp: event.timestamp,
        user_message: event.user_message.clone(),
        chatbot_response: event.chatbot_response.clone(),
        detected_intent: event.detected_intent.map(|i| i.as_str().to_owned()),
        confidence_score: event.confidence_score,
        has_attachment: event.has_attachment,
        attachment_type: event.attachment_type.clone(),
        response_time_ms: event.response_time_ms,
        products_shown: i64::try_from(event.products_shown).unwrap_or(i64::MAX),
        entities: event.entities.clone().map(Value::Object),
        sentiment_score: event.sentiment_score,
        was_successful: event.was_successful,
        error_type: event.error_type.clone(),
    }
}

/// Reconstructs an interaction from a persisted row.
///
/// Unknown intent labels are downgraded to `None` with a warning and a
/// non-object entity payload becomes an absent map, so one bad row cannot
/// poison a whole window scan.
pub fn row_to_interaction(row: InteractionRow) -> EventStoreResult<Interaction> {
    let session_id =
        SessionId::new(row.session_id).map_err(EventStoreError::invalid_persisted_data)?;
    let detected_intent = row.detected_intent.as_deref().and_then(|label| {
        let parsed = Intent::try_from(label).ok();
        if parsed.is_none() {
            warn!(label, "dropping unknown persisted intent label");
        }
        parsed
    });
    let entities: Option<EntityMap> = row.entities.and_then(|value| match value {
        Value::Object(map) => Some(map),
        _ => None,
    });

    let event = NewInteraction {
        session_id,
        timestamp: row.timestamp,
        user_message: row.user_message,
        chatbot_response: row.chatbot_response,
        detected_intent,
        confidence_score: row.confidence_score,
        has_attachment: row.has_attachment,
        attachment_type: row.attachment_type,
        response_time_ms: row.response_time_ms,
        products_shown: u64::try_from(row.products_shown).unwrap_or(0),
        entities,
        sentiment_score: row.sentiment_score,
        was_successful: row.was_successful,
        error_type: row.error_type,
    };
    Ok(Interaction::from_persisted(
        InteractionId::new(row.id),
        event,
    ))
}

/// Builds an insert/overwrite row from a period summary.
pub fn summary_to_new_row(summary: &PeriodSummary) -> NewSummaryRow {
    let metrics = summary.metrics();
    NewSummaryRow {
        date: summary.period_start(),
        period_type: summary.period_type().as_str().to_owned(),
        total_sessions: clamp_count(metrics.total_sessions),
        total_interactions: clamp_count(metrics.total_interactions),
        unique_users: clamp_count(metrics.unique_users),
        avg_session_duration_seconds: metrics.avg_session_duration_seconds,
        avg_response_time_ms: metrics.avg_response_time_ms,
        products_shown_count: clamp_count(metrics.products_shown_count),
        product_search_count: clamp_count(metrics.product_search_count),
        error_count: clamp_count(metrics.error_count),
        intent_distribution: distribution_to_value(&metrics.intent_distribution),
        error_distribution: distribution_to_value(&metrics.error_distribution),
        platform_distribution: distribution_to_value(&metrics.platform_distribution),
    }
}

/// Reconstructs a period summary from a persisted row.
///
/// Malformed distribution payloads deserialise to empty maps rather than
/// failing the read.
pub fn row_to_summary(row: SummaryRow) -> SummaryStoreResult<PeriodSummary> {
    let period_type = PeriodType::try_from(row.period_type.as_str())
        .map_err(crate::analytics::ports::SummaryStoreError::invalid_persisted_data)?;
    let metrics = SummaryMetrics {
        total_sessions: u64::try_from(row.total_sessions).unwrap_or(0),
        total_interactions: u64::try_from(row.total_interactions).unwrap_or(0),
        unique_users: u64::try_from(row.unique_users).unwrap_or(0),
        avg_session_duration_seconds: row.avg_session_duration_seconds,
        avg_response_time_ms: row.avg_response_time_ms,
        products_shown_count: u64::try_from(row.products_shown_count).unwrap_or(0),
        product_search_count: u64::try_from(row.product_search_count).unwrap_or(0),
        error_count: u64::try_from(row.error_count).unwrap_or(0),
        intent_distribution: value_to_distribution(row.intent_distribution),
        error_distribution: value_to_distribution(row.error_distribution),
        platform_distribution: value_to_distribution(row.platform_distribution),
    };
    Ok(PeriodSummary::new(row.date, period_type, metrics))
}

fn clamp_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn distribution_to_value(distribution: &BTreeMap<String, u64>) -> Value {
    serde_json::to_value(distribution).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

fn value_to_distribution(value: Value) -> BTreeMap<String, u64> {
    serde_json::from_value(value).unwrap_or_default()
}
