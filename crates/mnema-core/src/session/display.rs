//! Display reconciliation for the streamed event sequence.
//!
//! The display list is a superset of the canonical history, annotated
//! with `is_streaming` and client-local collapse state. It absorbs
//! partial, out-of-order, and duplicated events and converges to the
//! server's view at round completion. It is never sent to the server.
//!
//! Ordering invariant: the list matches arrival/creation order and is
//! never reordered -- completion mutates the matched element in place or
//! appends at the tail.

use std::collections::HashMap;

use uuid::Uuid;

use mnema_types::event::ChatStreamEvent;
use mnema_types::message::{ChatMessage, MessageRole};

/// One renderable message, with its in-flight flag.
#[derive(Debug, Clone)]
pub struct DisplayMessage {
    pub message: ChatMessage,
    /// True only while content is still being appended.
    pub is_streaming: bool,
}

/// What an applied event did, so the session controller knows when to
/// replace the history store or refresh recommendations.
#[derive(Debug)]
pub enum Applied {
    /// A delta was appended (or a new streaming message created).
    Delta,
    /// A message was finalized in place or appended.
    Completed,
    /// The round finished; carries the server's canonical history.
    RoundCompleted(Vec<ChatMessage>),
    /// The server reported an application error.
    Errored(String),
}

/// Maps wire events onto the renderable message list.
#[derive(Debug, Default)]
pub struct DisplayReconciler {
    messages: Vec<DisplayMessage>,
    /// Client-local collapse overrides, keyed by message or tool-call id.
    collapsed: HashMap<String, bool>,
    /// Id of the currently-streaming assistant message, used as the
    /// fallback when an event omits its correlation id.
    streaming_id: Option<String>,
}

impl DisplayReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The renderable messages, in arrival/creation order.
    pub fn messages(&self) -> &[DisplayMessage] {
        &self.messages
    }

    /// Whether any message is still streaming.
    pub fn has_streaming(&self) -> bool {
        self.messages.iter().any(|m| m.is_streaming)
    }

    /// Collapse state for a message or tool-call id (expanded by default).
    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.get(id).copied().unwrap_or(false)
    }

    pub fn set_collapsed(&mut self, id: &str, collapsed: bool) {
        self.collapsed.insert(id.to_string(), collapsed);
    }

    /// Append an already-complete user message.
    pub fn push_user(&mut self, message: ChatMessage) {
        self.messages.push(DisplayMessage {
            message,
            is_streaming: false,
        });
    }

    /// Append a streaming assistant placeholder and make it the active
    /// correlation target for id-less events.
    pub fn push_placeholder(&mut self, id: &str) {
        self.messages.push(DisplayMessage {
            message: ChatMessage::assistant_placeholder(id),
            is_streaming: true,
        });
        self.streaming_id = Some(id.to_string());
    }

    /// Reset the display list and all collapse state.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.collapsed.clear();
        self.streaming_id = None;
    }

    /// Apply one decoded protocol event.
    pub fn apply(&mut self, event: ChatStreamEvent) -> Applied {
        match event {
            ChatStreamEvent::MessageDelta { message_id, delta } => {
                self.apply_delta(message_id, delta);
                Applied::Delta
            }
            ChatStreamEvent::MessageComplete {
                message_id,
                message,
            } => {
                self.apply_complete(message_id, message);
                Applied::Completed
            }
            ChatStreamEvent::RoundComplete { messages } => {
                for m in &mut self.messages {
                    m.is_streaming = false;
                }
                self.streaming_id = None;
                Applied::RoundCompleted(messages)
            }
            ChatStreamEvent::Error { error } => {
                self.fail_active(&format!("Error: {error}"));
                Applied::Errored(error)
            }
        }
    }

    /// Put an error string into the active streaming message and clear
    /// its streaming flag. History is untouched. No-op when nothing is
    /// streaming.
    pub fn fail_active(&mut self, text: &str) -> bool {
        let Some(id) = self.streaming_id.take() else {
            return false;
        };
        let Some(entry) = self.messages.iter_mut().find(|m| m.message.id == id) else {
            return false;
        };
        entry.message.content = Some(text.to_string());
        entry.is_streaming = false;
        // Errors render expanded.
        self.collapsed.insert(id, false);
        true
    }

    fn apply_delta(&mut self, message_id: Option<String>, delta: String) {
        // Resolve the id-or-current-streaming-id fallback once, here.
        let id = message_id
            .or_else(|| self.streaming_id.clone())
            .unwrap_or_else(|| Uuid::now_v7().to_string());

        if let Some(entry) = self
            .messages
            .iter_mut()
            .find(|m| m.is_streaming && m.message.id == id)
        {
            entry
                .message
                .content
                .get_or_insert_with(String::new)
                .push_str(&delta);
        } else {
            // Server-initiated new message id mid-stream (or no
            // placeholder was pre-created): start a fresh streaming one.
            let mut message = ChatMessage::assistant_placeholder(id.as_str());
            message.content = Some(delta);
            self.messages.push(DisplayMessage {
                message,
                is_streaming: true,
            });
        }
        self.streaming_id = Some(id);
    }

    fn apply_complete(&mut self, message_id: Option<String>, mut message: ChatMessage) {
        let target = self.resolve_target(message_id.as_deref());

        // The finalized message keeps a stable id: the server's if given,
        // else the replaced entry's, else a fresh one.
        let final_id = match (&message_id, target) {
            (Some(id), _) => id.clone(),
            (None, Some(index)) => self.messages[index].message.id.clone(),
            (None, None) if !message.id.is_empty() => message.id.clone(),
            (None, None) => Uuid::now_v7().to_string(),
        };
        message.id = final_id.clone();

        let index = match target {
            Some(index) => {
                // Replace in place, preserving position.
                self.messages[index] = DisplayMessage {
                    message,
                    is_streaming: false,
                };
                index
            }
            None => {
                self.messages.push(DisplayMessage {
                    message,
                    is_streaming: false,
                });
                self.messages.len() - 1
            }
        };

        // The active correlation target is gone once nothing with its id
        // is still streaming (the replaced placeholder may have had a
        // different id than the server assigned).
        if let Some(sid) = self.streaming_id.clone() {
            if !self
                .messages
                .iter()
                .any(|m| m.is_streaming && m.message.id == sid)
            {
                self.streaming_id = None;
            }
        }

        let finalized = &mut self.messages[index].message;

        // Tool results collapse by default.
        if finalized.role == MessageRole::Tool {
            self.collapsed.insert(final_id, true);
        }

        // Tool calls get fallback ids and collapse by default.
        if let Some(calls) = finalized.tool_calls.as_mut() {
            let mut call_ids = Vec::with_capacity(calls.len());
            for call in calls.iter_mut() {
                if call.id.is_empty() {
                    call.id = Uuid::now_v7().to_string();
                }
                call_ids.push(call.id.clone());
            }
            for id in call_ids {
                self.collapsed.insert(id, true);
            }
        }
    }

    /// Find the display index a completion should replace: by id first,
    /// then the single pending streaming assistant placeholder.
    ///
    /// The placeholder fallback assumes at most one concurrently-streaming
    /// assistant message, which the protocol currently guarantees.
    fn resolve_target(&self, message_id: Option<&str>) -> Option<usize> {
        if let Some(id) = message_id {
            if let Some(index) = self.messages.iter().position(|m| m.message.id == id) {
                return Some(index);
            }
        }
        self.messages
            .iter()
            .position(|m| m.is_streaming && m.message.role == MessageRole::Assistant)
    }
}
