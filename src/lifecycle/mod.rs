//! Conversation lifecycle: ensure conversation, create request, stream, retry.

pub mod controller;

pub use controller::{ConversationController, TurnReport};
