//! Orchestration services for the assistant subsystem.

mod chat;

pub use chat::ChatService;
