//! Append-only conversation history.

use wayfinder_ai::{Message, Role};
use wayfinder_common::SessionId;

/// Turns of one conversation, oldest first.
///
/// Only the orchestrator appends, always a user turn followed by the
/// assistant turn answering it.
#[derive(Debug, Clone, Default)]
pub struct ConversationSession {
    id: SessionId,
    turns: Vec<Message>,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn turns(&self) -> &[Message] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last_reply(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
    }

    pub(crate) fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(Message::new(Role::User, text));
    }

    pub(crate) fn push_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(Message::new(Role::Assistant, text));
    }
}
