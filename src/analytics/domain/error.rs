//! Domain error types for analytics validation.

use thiserror::Error;

/// Errors raised by analytics domain validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsDomainError {
    /// The session identifier is empty or whitespace-only.
    #[error("session identifier must not be empty")]
    EmptySessionId,

    /// The intent label is not part of the fixed intent set.
    #[error("unknown intent label: {0}")]
    UnknownIntent(String),

    /// The period type label is not recognised.
    #[error("unknown period type: {0}")]
    UnknownPeriodType(String),

    /// A confidence score fell outside the `0.0..=1.0` range.
    #[error("confidence score {0} is outside 0.0..=1.0")]
    ConfidenceOutOfRange(f64),

    /// A sentiment score fell outside the `-1.0..=1.0` range.
    #[error("sentiment score {0} is outside -1.0..=1.0")]
    SentimentOutOfRange(f64),
}
