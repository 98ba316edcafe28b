//! Canonical conversation history.
//!
//! The server-acknowledged message list, replaced wholesale at round
//! completion and never patched incrementally. This is the source of
//! truth sent back to the agent on each new turn. Streaming state cannot
//! exist here -- `ChatMessage` has no such flag; it belongs to the
//! display layer alone.

use mnema_types::message::{ChatMessage, MessageRole};

/// Server-acknowledged message list for one session.
#[derive(Debug, Default)]
pub struct ConversationHistory {
    messages: Vec<ChatMessage>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical messages, in order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Clone of the canonical messages, for building an outbound request.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }

    /// Atomically replace the history with the server's canonical view.
    ///
    /// Single assignment, never field-by-field mutation -- the next
    /// outbound request is always built from a complete prior turn.
    pub fn replace(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
    }

    /// Whether any user message has been acknowledged yet.
    pub fn has_user_message(&self) -> bool {
        self.messages.iter().any(|m| m.role == MessageRole::User)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
