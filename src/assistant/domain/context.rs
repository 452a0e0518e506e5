//! Conversation context passed to the language model.
//!
//! Context is rebuilt per call from the event store's interaction history;
//! there is no process-local transcript state, so every instance of the
//! service sees the same conversation.

use crate::analytics::domain::Interaction;

/// Who produced a context turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    /// The shopper's message.
    Shopper,
    /// The assistant's reply.
    Assistant,
}

/// One prior message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextTurn {
    /// Who spoke.
    pub speaker: Speaker,
    /// What was said.
    pub message: String,
}

/// Recent conversation history for one session, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationContext {
    turns: Vec<ContextTurn>,
}

impl ConversationContext {
    /// An empty context, used when history cannot be loaded.
    #[must_use]
    pub const fn empty() -> Self {
        Self { turns: Vec::new() }
    }

    /// Builds context from persisted interactions, oldest first. Each
    /// interaction contributes the shopper's message and, when one was
    /// produced, the assistant's reply.
    #[must_use]
    pub fn from_interactions(interactions: &[Interaction]) -> Self {
        let mut turns = Vec::with_capacity(interactions.len() * 2);
        for interaction in interactions {
            turns.push(ContextTurn {
                speaker: Speaker::Shopper,
                message: interaction.event().user_message.clone(),
            });
            if let Some(reply) = interaction.event().chatbot_response.as_deref() {
                turns.push(ContextTurn {
                    speaker: Speaker::Assistant,
                    message: reply.to_owned(),
                });
            }
        }
        Self { turns }
    }

    /// Returns the turns, oldest first.
    #[must_use]
    pub fn turns(&self) -> &[ContextTurn] {
        &self.turns
    }

    /// Returns `true` when there is no prior history.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
