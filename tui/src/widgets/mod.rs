//! Widgets
//!
//! Borderless building blocks for the chat screen.

mod conversation;

pub use conversation::{ConversationView, ConversationViewState};
