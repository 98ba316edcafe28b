//! Follow-up prompt recommendations.
//!
//! Two triggers funnel into one fetch: immediately after a round
//! completes (chat content as context) and after a period of user
//! inactivity (context-window entities as context). A failed fetch
//! degrades to an empty list -- it never raises to the caller.

pub mod idle;

use tracing::warn;

use mnema_types::graph::{Suggestion, SuggestionMessage, SuggestionRequest};
use mnema_types::message::{ChatMessage, MessageRole};

use crate::client::BoxSuggestService;
use crate::context::ContextWindow;

pub use idle::IdleTimer;

/// Current suggestion list plus the panel's collapse flag.
#[derive(Debug, Default)]
pub struct SuggestionPanel {
    suggestions: Vec<Suggestion>,
    collapsed: bool,
}

impl SuggestionPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    /// Replace the list wholesale and re-open the panel.
    pub fn replace(&mut self, suggestions: Vec<Suggestion>) {
        self.suggestions = suggestions;
        self.collapsed = false;
    }

    /// Select a suggestion: returns its text and clears the list, so the
    /// caller can submit it exactly like manual input.
    pub fn take(&mut self, index: usize) -> Option<String> {
        if index >= self.suggestions.len() {
            return None;
        }
        let text = self.suggestions[index].text.clone();
        self.suggestions.clear();
        Some(text)
    }

    pub fn clear(&mut self) {
        self.suggestions.clear();
    }
}

/// Post-round context: the textual content of all user messages plus the
/// single most recent assistant message that issued no tool calls
/// (filtering out intermediate ReAct steps).
pub fn round_messages(history: &[ChatMessage]) -> Vec<SuggestionMessage> {
    let mut messages: Vec<SuggestionMessage> = history
        .iter()
        .filter(|m| m.role == MessageRole::User && !m.text().is_empty())
        .map(|m| SuggestionMessage {
            role: m.role.to_string(),
            content: m.text().to_string(),
        })
        .collect();

    if let Some(answer) = history
        .iter()
        .rev()
        .find(|m| m.role == MessageRole::Assistant && !m.has_tool_calls() && !m.text().is_empty())
    {
        messages.push(SuggestionMessage {
            role: answer.role.to_string(),
            content: answer.text().to_string(),
        });
    }

    messages
}

/// Build the post-round request from the canonical history.
pub fn post_round_request(history: &[ChatMessage]) -> SuggestionRequest {
    SuggestionRequest {
        messages: round_messages(history),
        context: Vec::new(),
    }
}

/// Build the idle request from the context window's entities.
pub fn idle_request(window: &ContextWindow) -> SuggestionRequest {
    SuggestionRequest {
        messages: Vec::new(),
        context: window.context_strings(),
    }
}

/// Fetch suggestions, degrading every failure to an empty list.
pub async fn fetch_suggestions(
    service: &BoxSuggestService,
    request: SuggestionRequest,
) -> Vec<Suggestion> {
    match service.suggest(request).await {
        Ok(suggestions) => suggestions,
        Err(err) => {
            warn!(error = %err, "suggestion fetch failed, degrading to empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnema_types::message::ToolCall;

    fn user(text: &str) -> ChatMessage {
        ChatMessage::user(text)
    }

    fn assistant(text: &str, tool_calls: bool) -> ChatMessage {
        ChatMessage {
            id: String::new(),
            role: MessageRole::Assistant,
            content: Some(text.to_string()),
            tool_calls: tool_calls.then(|| {
                vec![ToolCall {
                    id: "c1".to_string(),
                    name: "search_knowledge_graph".to_string(),
                    arguments: "{}".to_string(),
                }]
            }),
            tool_call_id: None,
            name: None,
        }
    }

    #[test]
    fn test_round_messages_filters_react_steps() {
        let history = vec![
            user("what is rust"),
            assistant("", true),
            assistant("Rust is a language.", false),
            user("tell me more"),
            assistant("searching...", true),
            assistant("It has ownership.", false),
        ];
        let messages = round_messages(&history);
        // Two user messages plus the single most recent plain answer.
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].content, "what is rust");
        assert_eq!(messages[1].content, "tell me more");
        assert_eq!(messages[2].role, "assistant");
        assert_eq!(messages[2].content, "It has ownership.");
    }

    #[test]
    fn test_round_messages_without_plain_assistant() {
        let history = vec![user("hi"), assistant("", true)];
        let messages = round_messages(&history);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
    }

    #[test]
    fn test_idle_request_uses_window_entities() {
        let mut window = ContextWindow::new(5);
        window.add(mnema_types::graph::ActiveNode {
            id: "concept:rust".to_string(),
            label: "Rust".to_string(),
            desc: "a systems language".to_string(),
        });
        let request = idle_request(&window);
        assert!(request.messages.is_empty());
        assert_eq!(request.context, vec!["Rust: a systems language"]);
    }

    #[test]
    fn test_panel_replace_reopens() {
        let mut panel = SuggestionPanel::new();
        panel.set_collapsed(true);
        panel.replace(vec![Suggestion {
            text: "Ask about ownership".to_string(),
        }]);
        assert!(!panel.is_collapsed());
        assert_eq!(panel.suggestions().len(), 1);
    }

    #[test]
    fn test_panel_take_clears_list() {
        let mut panel = SuggestionPanel::new();
        panel.replace(vec![
            Suggestion {
                text: "first".to_string(),
            },
            Suggestion {
                text: "second".to_string(),
            },
        ]);
        assert_eq!(panel.take(1).as_deref(), Some("second"));
        assert!(panel.is_empty());
        assert!(panel.take(0).is_none());
    }
}
