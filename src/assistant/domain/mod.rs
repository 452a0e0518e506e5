//! Assistant domain types.

mod classification;
mod context;
mod reply;
mod vision;

pub use classification::IntentClassification;
pub use context::{ContextTurn, ConversationContext, Speaker};
pub use reply::ChatReply;
pub use vision::ImageAnalysis;
