//! Chat message types for Mnema.
//!
//! These types model one conversational turn unit on the wire: the role
//! taxonomy, tool invocations attached to assistant messages, and the
//! correlation fields that tie a tool result back to its invoking call.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::Tool => write!(f, "tool"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            "tool" => Ok(MessageRole::Tool),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A tool invocation carried by an assistant message.
///
/// `arguments` is kept as raw JSON text exactly as the agent produced it;
/// it is only parsed by whoever executes the tool, never by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

/// One conversational turn unit.
///
/// The `id` is assigned client-side for in-flight messages and may be
/// overwritten by a server-assigned id on completion. The server protocol
/// does not require it, so an empty id is skipped on the wire.
///
/// Streaming state is intentionally NOT part of this type -- it lives on
/// the display layer only, so the canonical history can never contain a
/// half-streamed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub role: MessageRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Present only on assistant messages that invoke tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Present only on tool messages; correlates the result to its call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Tool name, present only on tool messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    /// Create a user message with a fresh client-side id.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            role: MessageRole::User,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    /// Create an empty assistant message with the given id.
    pub fn assistant_placeholder(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: MessageRole::Assistant,
            content: None,
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    /// Whether this assistant message invokes any tool.
    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|tc| !tc.is_empty())
    }

    /// Text content, or the empty string for content-less messages.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [
            MessageRole::System,
            MessageRole::User,
            MessageRole::Assistant,
            MessageRole::Tool,
        ] {
            let s = role.to_string();
            let parsed: MessageRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_message_role_serde() {
        let json = serde_json::to_string(&MessageRole::Tool).unwrap();
        assert_eq!(json, "\"tool\"");
        let parsed: MessageRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MessageRole::Tool);
    }

    #[test]
    fn test_user_message_has_id_and_content() {
        let msg = ChatMessage::user("hello");
        assert!(!msg.id.is_empty());
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.text(), "hello");
        assert!(!msg.has_tool_calls());
    }

    #[test]
    fn test_wire_form_skips_client_fields() {
        let msg = ChatMessage {
            id: String::new(),
            role: MessageRole::Assistant,
            content: Some("hi".to_string()),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn test_deserialize_tool_message_from_server() {
        let json = r###"{"role":"tool","content":"## Results","tool_call_id":"call_1","name":"search_knowledge_graph"}"###;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.role, MessageRole::Tool);
        assert_eq!(msg.id, "");
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(msg.name.as_deref(), Some("search_knowledge_graph"));
    }

    #[test]
    fn test_deserialize_assistant_with_tool_calls() {
        let json = r#"{"role":"assistant","content":null,"tool_calls":[{"id":"c1","name":"search_knowledge_graph","arguments":"{\"query\":\"rust\"}"}]}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert!(msg.content.is_none());
        assert!(msg.has_tool_calls());
        let calls = msg.tool_calls.unwrap();
        assert_eq!(calls[0].arguments, "{\"query\":\"rust\"}");
    }

    #[test]
    fn test_tool_call_missing_id_defaults_empty() {
        let json = r#"{"name":"get_document_details","arguments":"{}"}"#;
        let call: ToolCall = serde_json::from_str(json).unwrap();
        assert!(call.id.is_empty());
        assert_eq!(call.name, "get_document_details");
    }
}
