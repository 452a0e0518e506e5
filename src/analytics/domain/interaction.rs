//! Interaction records: one message/response exchange inside a session.

use super::{AnalyticsDomainError, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Extracted message entities, keyed by entity name.
///
/// Stored as an opaque JSON object; a malformed persisted blob deserialises
/// to an empty map rather than failing the read.
pub type EntityMap = serde_json::Map<String, serde_json::Value>;

/// Entity key under which the language model reports a product name.
pub const PRODUCT_ENTITY_KEY: &str = "product";

/// Classification label describing what the shopper is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Search the catalog for products.
    ProductSearch,
    /// Ask about one specific product.
    ProductInfo,
    /// Check the status of an order.
    OrderStatus,
    /// Ask for product recommendations.
    Recommendations,
    /// A general shopping question.
    GeneralQuestion,
    /// A greeting.
    Greeting,
    /// A customer-support request.
    Support,
    /// Ask about a product's price.
    PriceInquiry,
    /// Compare products.
    Comparison,
    /// Ask for help with checkout.
    CheckoutHelp,
}

impl Intent {
    /// Returns the wire label for this intent (for example `"product_search"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProductSearch => "product_search",
            Self::ProductInfo => "product_info",
            Self::OrderStatus => "order_status",
            Self::Recommendations => "recommendations",
            Self::GeneralQuestion => "general_question",
            Self::Greeting => "greeting",
            Self::Support => "support",
            Self::PriceInquiry => "price_inquiry",
            Self::Comparison => "comparison",
            Self::CheckoutHelp => "checkout_help",
        }
    }
}

impl TryFrom<&str> for Intent {
    type Error = AnalyticsDomainError;

    fn try_from(label: &str) -> Result<Self, Self::Error> {
        match label {
            "product_search" => Ok(Self::ProductSearch),
            "product_info" => Ok(Self::ProductInfo),
            "order_status" => Ok(Self::OrderStatus),
            "recommendations" => Ok(Self::Recommendations),
            "general_question" => Ok(Self::GeneralQuestion),
            "greeting" => Ok(Self::Greeting),
            "support" => Ok(Self::Support),
            "price_inquiry" => Ok(Self::PriceInquiry),
            "comparison" => Ok(Self::Comparison),
            "checkout_help" => Ok(Self::CheckoutHelp),
            other => Err(AnalyticsDomainError::UnknownIntent(other.to_owned())),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store-assigned interaction sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionId(i64);

impl InteractionId {
    /// Wraps a store-assigned identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

}

impl fmt::Display for InteractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameter object describing one interaction to append.
///
/// The event store assigns the identifier; everything else is fixed by the
/// recorder at append time and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInteraction {
    /// Session the interaction belongs to.
    pub session_id: SessionId,
    /// Recording timestamp.
    pub timestamp: DateTime<Utc>,
    /// The shopper's message text.
    pub user_message: String,
    /// The assistant's reply text, when one was produced.
    pub chatbot_response: Option<String>,
    /// Detected intent label.
    pub detected_intent: Option<Intent>,
    /// Classification confidence in `0.0..=1.0`.
    pub confidence_score: Option<f64>,
    /// Whether the message carried an attachment.
    pub has_attachment: bool,
    /// Attachment kind (for example `"image"`).
    pub attachment_type: Option<String>,
    /// Reply latency in milliseconds.
    pub response_time_ms: Option<i64>,
    /// Number of products shown in the reply.
    pub products_shown: u64,
    /// Extracted entity map.
    pub entities: Option<EntityMap>,
    /// Sentiment score in `-1.0..=1.0`.
    pub sentiment_score: Option<f64>,
    /// Whether the exchange completed without an internal failure.
    pub was_successful: bool,
    /// Error-kind label, set only when `was_successful` is `false`.
    pub error_type: Option<String>,
}

impl NewInteraction {
    /// Checks the score fields against their documented ranges.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsDomainError::ConfidenceOutOfRange`] or
    /// [`AnalyticsDomainError::SentimentOutOfRange`] when a score falls
    /// outside its range. `NaN` never satisfies a range and is rejected.
    pub fn validate(&self) -> Result<(), AnalyticsDomainError> {
        if let Some(score) = self.confidence_score
            && !(0.0..=1.0).contains(&score)
        {
            return Err(AnalyticsDomainError::ConfidenceOutOfRange(score));
        }
        if let Some(score) = self.sentiment_score
            && !(-1.0..=1.0).contains(&score)
        {
            return Err(AnalyticsDomainError::SentimentOutOfRange(score));
        }
        Ok(())
    }
}

/// A persisted interaction with its store-assigned identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    id: InteractionId,
    event: NewInteraction,
}

impl Interaction {
    /// Attaches a store-assigned identifier to an appended event.
    #[must_use]
    pub const fn from_persisted(id: InteractionId, event: NewInteraction) -> Self {
        Self { id, event }
    }

    /// Returns the store-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> InteractionId {
        self.id
    }

    /// Returns the recorded event fields.
    #[must_use]
    pub const fn event(&self) -> &NewInteraction {
        &self.event
    }

    /// Returns the owning session identifier.
    #[must_use]
    pub const fn session_id(&self) -> &SessionId {
        &self.event.session_id
    }

    /// Returns the recording timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.event.timestamp
    }

    /// Returns the detected intent, when one was classified.
    #[must_use]
    pub const fn detected_intent(&self) -> Option<Intent> {
        self.event.detected_intent
    }

    /// Returns the product name extracted into the entity map, if present.
    #[must_use]
    pub fn product_entity(&self) -> Option<&str> {
        self.event
            .entities
            .as_ref()
            .and_then(|entities| entities.get(PRODUCT_ENTITY_KEY))
            .and_then(serde_json::Value::as_str)
    }
}
