//! The Session aggregate: one continuous shopper conversation.

use super::AnalyticsDomainError;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, externally supplied session identifier.
///
/// The transport layer mints these; the analytics core only requires them to
/// be unique and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Validates and wraps a raw session identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsDomainError::EmptySessionId`] when the identifier
    /// is empty or whitespace-only.
    pub fn new(raw: impl Into<String>) -> Result<Self, AnalyticsDomainError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(AnalyticsDomainError::EmptySessionId);
        }
        Ok(Self(raw))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Optional descriptive fields captured when a session is opened.
///
/// Auto-provisioned sessions carry the default (all-empty) metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMetadata {
    user_id: Option<String>,
    platform: Option<String>,
    device_info: Option<String>,
}

impl SessionMetadata {
    /// Creates empty metadata, matching an anonymous session.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            user_id: None,
            platform: None,
            device_info: None,
        }
    }

    /// Attaches the shopper's user identifier.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Attaches the originating platform tag (for example `"web"`).
    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Attaches a free-form device descriptor.
    #[must_use]
    pub fn with_device_info(mut self, device_info: impl Into<String>) -> Self {
        self.device_info = Some(device_info.into());
        self
    }
}

/// One shopper conversation, bounded by start and (optional) end timestamps.
///
/// # Invariants
///
/// - `start_time` is set at creation and never changes
/// - `end_time` transitions from `None` to `Some` exactly once
/// - sessions are never deleted by this subsystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    session_id: SessionId,
    user_id: Option<String>,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    platform: Option<String>,
    device_info: Option<String>,
}

/// Parameter object for reconstructing a persisted session.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedSessionData {
    /// Persisted session identifier.
    pub session_id: SessionId,
    /// Persisted user identifier, when the shopper was known.
    pub user_id: Option<String>,
    /// Persisted start timestamp.
    pub start_time: DateTime<Utc>,
    /// Persisted end timestamp, when the session was closed.
    pub end_time: Option<DateTime<Utc>>,
    /// Persisted platform tag.
    pub platform: Option<String>,
    /// Persisted device descriptor.
    pub device_info: Option<String>,
}

impl Session {
    /// Opens a new session starting at the current clock time.
    #[must_use]
    pub fn open(session_id: SessionId, metadata: SessionMetadata, clock: &impl Clock) -> Self {
        let SessionMetadata {
            user_id,
            platform,
            device_info,
        } = metadata;
        Self {
            session_id,
            user_id,
            start_time: clock.utc(),
            end_time: None,
            platform,
            device_info,
        }
    }

    /// Reconstructs a session from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSessionData) -> Self {
        Self {
            session_id: data.session_id,
            user_id: data.user_id,
            start_time: data.start_time,
            end_time: data.end_time,
            platform: data.platform,
            device_info: data.device_info,
        }
    }

    /// Returns the session identifier.
    #[must_use]
    pub const fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Returns the shopper's user identifier, when known.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Returns the start timestamp.
    #[must_use]
    pub const fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Returns the end timestamp, when the session has been closed.
    #[must_use]
    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Returns the platform tag.
    #[must_use]
    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    /// Returns the device descriptor.
    #[must_use]
    pub fn device_info(&self) -> Option<&str> {
        self.device_info.as_deref()
    }

    /// Returns `true` once the session has been closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.end_time.is_some()
    }

    /// Closes the session at the current clock time.
    ///
    /// Closing is a one-way transition: the first call sets `end_time` and
    /// returns `true`; later calls leave the existing timestamp untouched and
    /// return `false`.
    pub fn close(&mut self, clock: &impl Clock) -> bool {
        if self.end_time.is_some() {
            return false;
        }
        self.end_time = Some(clock.utc());
        true
    }

    /// Returns the session duration in seconds, once the session is closed.
    #[must_use]
    pub fn duration_seconds(&self) -> Option<f64> {
        self.end_time
            .map(|end| (end - self.start_time).num_milliseconds() as f64 / 1000.0)
    }
}

/// A session paired with its interaction count, for recent-activity listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionActivity {
    /// The session record.
    pub session: Session,
    /// Number of interactions recorded against the session.
    pub interaction_count: u64,
}
