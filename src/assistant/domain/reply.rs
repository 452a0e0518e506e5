//! The reply shape every chat operation resolves to.

use serde::Serialize;
use serde_json::Value;

/// A well-formed assistant reply.
///
/// Every chat path resolves to one of these; internal failures degrade to
/// apologetic fallback text rather than a broken response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    /// Reply text shown to the shopper.
    pub message: String,
    /// Optional structured payload (products, order details, analysis).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Internal error note, set only on degraded replies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatReply {
    /// A plain text reply.
    #[must_use]
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            error: None,
        }
    }

    /// A reply carrying a structured payload.
    #[must_use]
    pub fn with_data(message: impl Into<String>, data: Value) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    /// A degraded reply: friendly text plus an internal error note.
    #[must_use]
    pub fn degraded(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            error: Some(error.into()),
        }
    }
}
