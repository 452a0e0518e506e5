//! Language model port: the slow, fallible collaborator behind the chat.

use crate::assistant::domain::{ConversationContext, ImageAnalysis, IntentClassification};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for language model operations.
pub type LanguageModelResult<T> = Result<T, LanguageModelError>;

/// Contract over the external language model.
///
/// Calls are treated as slow, fallible and side-effect-free; the chat
/// service never retries them, it degrades instead.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Classifies one shopper message into an intent plus extracted
    /// entities.
    async fn classify_intent(&self, message: &str) -> LanguageModelResult<IntentClassification>;

    /// Extracts a product descriptor from an image. Returns `Ok(None)` when
    /// the model's output cannot be parsed into a descriptor.
    async fn analyze_image(&self, image: &[u8]) -> LanguageModelResult<Option<ImageAnalysis>>;

    /// Generates free-form reply text for messages no structured handler
    /// covers.
    async fn generate_reply(
        &self,
        message: &str,
        context: &ConversationContext,
    ) -> LanguageModelResult<String>;
}

/// Errors returned by language model implementations.
#[derive(Debug, Clone, Error)]
pub enum LanguageModelError {
    /// The upstream call failed or timed out.
    #[error("language model upstream failure: {0}")]
    Upstream(Arc<dyn std::error::Error + Send + Sync>),

    /// The model answered, but not in the expected shape.
    #[error("malformed language model output: {0}")]
    MalformedOutput(String),
}

impl LanguageModelError {
    /// Wraps an upstream transport or API error.
    pub fn upstream(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Upstream(Arc::new(err))
    }
}
