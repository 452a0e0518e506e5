//! Intent classification results from the language model.

use crate::analytics::domain::{EntityMap, Intent};
use serde_json::Value;

/// What the language model made of one shopper message.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentClassification {
    /// The detected intent.
    pub intent: Intent,
    /// Classification confidence in `0.0..=1.0`.
    pub confidence: f64,
    /// Extracted entities (`"product"`, `"category"`, `"order_id"`, ...).
    pub entities: EntityMap,
}

impl IntentClassification {
    /// Creates a classification.
    #[must_use]
    pub const fn new(intent: Intent, confidence: f64, entities: EntityMap) -> Self {
        Self {
            intent,
            confidence,
            entities,
        }
    }

    /// The soft-failure classification used when the model is unavailable or
    /// returns garbage: a general question at middling confidence with no
    /// entities.
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(Intent::GeneralQuestion, 0.5, EntityMap::new())
    }

    /// Returns a non-empty string entity by key.
    #[must_use]
    pub fn entity(&self, key: &str) -> Option<&str> {
        self.entities
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// The extracted product name, when present.
    #[must_use]
    pub fn product(&self) -> Option<&str> {
        self.entity("product")
    }

    /// The extracted category, when present.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.entity("category")
    }

    /// The extracted order identifier, when present.
    #[must_use]
    pub fn order_id(&self) -> Option<&str> {
        self.entity("order_id")
    }
}
