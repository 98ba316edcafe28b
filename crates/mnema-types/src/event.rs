//! Chat stream protocol events.
//!
//! The agent server answers a chat request with a stream of `data: <json>`
//! frames. Each frame carries an `event` discriminator and event-specific
//! fields; the `message_id` correlation field may be absent, in which case
//! the display layer falls back to its currently-streaming message id.

use serde::{Deserialize, Serialize};

use crate::message::ChatMessage;

/// Body of an outbound chat request: the full prior history plus the new
/// user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// One decoded protocol event from the chat stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChatStreamEvent {
    /// Incremental text appended to a streaming message.
    MessageDelta {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
        delta: String,
    },

    /// A message (assistant or tool) finished; carries the full object.
    MessageComplete {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
        message: ChatMessage,
    },

    /// The round finished; carries the server's canonical history.
    RoundComplete { messages: Vec<ChatMessage> },

    /// Application-level error reported by the server mid-stream.
    Error { error: String },
}
