//! Event recording service: idempotent session lifecycle and append-only
//! interaction telemetry.

use crate::analytics::{
    domain::{
        AnalyticsDomainError, EntityMap, Intent, Interaction, NewInteraction, Session,
        SessionActivity, SessionId, SessionMetadata,
    },
    ports::{EventStore, EventStoreError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for opening a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenSessionRequest {
    session_id: String,
    metadata: SessionMetadata,
}

impl OpenSessionRequest {
    /// Creates a request for the given session identifier.
    #[must_use]
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            metadata: SessionMetadata::new(),
        }
    }

    /// Attaches the shopper's user identifier.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.metadata = self.metadata.with_user_id(user_id);
        self
    }

    /// Attaches the originating platform tag.
    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.metadata = self.metadata.with_platform(platform);
        self
    }

    /// Attaches a device descriptor.
    #[must_use]
    pub fn with_device_info(mut self, device_info: impl Into<String>) -> Self {
        self.metadata = self.metadata.with_device_info(device_info);
        self
    }
}

/// Request payload for recording one interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordInteractionRequest {
    session_id: String,
    user_message: String,
    chatbot_response: Option<String>,
    intent: Option<Intent>,
    confidence: Option<f64>,
    has_attachment: bool,
    attachment_type: Option<String>,
    response_time_ms: Option<i64>,
    products_shown: u64,
    entities: Option<EntityMap>,
    sentiment_score: Option<f64>,
    was_successful: bool,
    error_type: Option<String>,
}

impl RecordInteractionRequest {
    /// Creates a request with the mandatory fields; everything else defaults
    /// to absent, zero products shown, and a successful outcome.
    #[must_use]
    pub fn new(session_id: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            user_message: user_message.into(),
            chatbot_response: None,
            intent: None,
            confidence: None,
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

    /// Attaches the assistant's reply text.
    #[must_use]
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.chatbot_response = Some(response.into());
        self
    }

    /// Attaches the detected intent and its confidence.
    #[must_use]
    pub const fn with_intent(mut self, intent: Intent, confidence: f64) -> Self {
        self.intent = Some(intent);
        self.confidence = Some(confidence);
        self
    }

    /// Flags an attachment of the given kind.
    #[must_use]
    pub fn with_attachment(mut self, kind: impl Into<String>) -> Self {
        self.has_attachment = true;
        self.attachment_type = Some(kind.into());
        self
    }

    /// Attaches the reply latency in milliseconds.
    #[must_use]
    pub const fn with_response_time_ms(mut self, latency_ms: i64) -> Self {
        self.response_time_ms = Some(latency_ms);
        self
    }

    /// Sets the number of products shown in the reply.
    #[must_use]
    pub const fn with_products_shown(mut self, count: u64) -> Self {
        self.products_shown = count;
        self
    }

    /// Attaches the extracted entity map.
    #[must_use]
    pub fn with_entities(mut self, entities: EntityMap) -> Self {
        self.entities = Some(entities);
        self
    }

    /// Attaches a sentiment score.
    #[must_use]
    pub const fn with_sentiment(mut self, score: f64) -> Self {
        self.sentiment_score = Some(score);
        self
    }

    /// Marks the exchange as failed with an error-kind label.
    #[must_use]
    pub fn failed(mut self, error_type: impl Into<String>) -> Self {
        self.was_successful = false;
        self.error_type = Some(error_type.into());
        self
    }
}

/// Service-level errors for event recording.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AnalyticsDomainError),
    /// Event store operation failed.
    #[error(transparent)]
    Store(#[from] EventStoreError),
}

/// Result type for event recording operations.
pub type RecorderResult<T> = Result<T, RecorderError>;

/// Records session lifecycle events and interaction telemetry.
///
/// Every write is its own atomic unit: a failed call affects only that call
/// and surfaces as an `Err` the caller may retry.
#[derive(Clone)]
pub struct EventRecorder<S, C>
where
    S: EventStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> EventRecorder<S, C>
where
    S: EventStore,
    C: Clock + Send + Sync,
{
    /// Creates a new recorder.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Opens a session, idempotently.
    ///
    /// When a session with this identifier already exists it is returned
    /// unchanged; the original start timestamp and metadata are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError`] when the identifier fails validation or the
    /// store rejects the write.
    pub async fn open_session(&self, request: OpenSessionRequest) -> RecorderResult<Session> {
        let OpenSessionRequest {
            session_id,
            metadata,
        } = request;
        let session_id = SessionId::new(session_id)?;

        if let Some(existing) = self.store.find_session(&session_id).await? {
            info!(session_id = %session_id, "chat session already exists");
            return Ok(existing);
        }

        let session = Session::open(session_id, metadata, &*self.clock);
        let stored = self.store.insert_session(&session).await?;
        info!(session_id = %stored.session_id(), "created new chat session");
        Ok(stored)
    }

    /// Closes a session, setting its end timestamp once.
    ///
    /// Returns `Ok(None)` when the session identifier is unknown. Closing an
    /// already-closed session is a no-op returning the closed record.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError`] when the identifier fails validation or the
    /// store rejects the write.
    pub async fn close_session(&self, session_id: &str) -> RecorderResult<Option<Session>> {
        let session_id = SessionId::new(session_id)?;

        let Some(mut session) = self.store.find_session(&session_id).await? else {
            warn!(session_id = %session_id, "chat session not found for ending");
            return Ok(None);
        };

        if session.close(&*self.clock) {
            self.store.update_session(&session).await?;
            info!(session_id = %session_id, "ended chat session");
        }
        Ok(Some(session))
    }

    /// Appends one interaction.
    ///
    /// When the session identifier is unknown, a bare session (no user, no
    /// platform) is auto-provisioned first so a missing upstream open call
    /// never drops telemetry.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError`] when the identifier or a score field fails
    /// validation or the store rejects a write. A rejected event is not
    /// persisted and provisions no session.
    pub async fn record_interaction(
        &self,
        request: RecordInteractionRequest,
    ) -> RecorderResult<Interaction> {
        let session_id = SessionId::new(request.session_id)?;
        let event = NewInteraction {
            session_id,
            timestamp: self.clock.utc(),
            user_message: request.user_message,
            chatbot_response: request.chatbot_response,
            detected_intent: request.intent,
            confidence_score: request.confidence,
            has_attachment: request.has_attachment,
            attachment_type: request.attachment_type,
            response_time_ms: request.response_time_ms,
            products_shown: request.products_shown,
            entities: request.entities,
            sentiment_score: request.sentiment_score,
            was_successful: request.was_successful,
            error_type: request.error_type,
        };
        event.validate()?;

        if self.store.find_session(&event.session_id).await?.is_none() {
            warn!(session_id = %event.session_id, "chat session not found, creating now");
            let session =
                Session::open(event.session_id.clone(), SessionMetadata::new(), &*self.clock);
            self.store.insert_session(&session).await?;
        }

        let interaction = self.store.insert_interaction(&event).await?;
        info!(
            session_id = %interaction.session_id(),
            interaction_id = %interaction.id(),
            "recorded chat interaction"
        );
        Ok(interaction)
    }

    /// Returns the most recent interactions for one session, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError`] when the identifier fails validation or the
    /// store lookup fails.
    pub async fn recent_interactions(
        &self,
        session_id: &str,
        limit: usize,
    ) -> RecorderResult<Vec<Interaction>> {
        let session_id = SessionId::new(session_id)?;
        Ok(self.store.recent_interactions(&session_id, limit).await?)
    }

    /// Returns the most recently started sessions with interaction counts.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::Store`] when the store lookup fails.
    pub async fn recent_sessions(&self, limit: usize) -> RecorderResult<Vec<SessionActivity>> {
        Ok(self.store.recent_sessions(limit).await?)
    }
}
