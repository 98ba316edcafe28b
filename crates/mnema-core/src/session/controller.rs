//! Session controller.
//!
//! Owns the full session state (history, display, context window,
//! pending attachments, suggestions) and drives one round end to end:
//! build the outbound request, stream the response through the decoder,
//! feed the display reconciler, replace the history atomically at round
//! completion, and refresh recommendations.
//!
//! One in-flight request per session, enforced by the `loading` guard --
//! cooperative, not a lock. All failures land as text in the display
//! list; nothing escapes past this boundary as a hard error.

use futures_util::StreamExt;
use tracing::{debug, warn};
use uuid::Uuid;

use mnema_types::event::{ChatRequest, ChatStreamEvent};
use mnema_types::graph::{ActiveNode, NodeDetail};
use mnema_types::message::{ChatMessage, MessageRole};

use crate::client::{AgentTransport, BoxGraphService, BoxSuggestService};
use crate::context::{ContextWindow, PendingNodes};
use crate::recommend::{self, SuggestionPanel};

use super::display::{Applied, DisplayMessage, DisplayReconciler};
use super::history::ConversationHistory;

/// Per-send lifecycle: `Idle -> Sending -> Streaming -> {Completed | Errored}`.
///
/// `Completed` and `Errored` are as ready as `Idle` -- the next send (or
/// `clear`) leaves them. No state permits a second concurrent send while
/// one is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Sending,
    Streaming,
    Completed,
    Errored,
}

/// Result of a `send` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The round ran to completion.
    Completed,
    /// The round terminated on a transport or application error.
    Errored,
    /// Nothing to send (empty text, no pending nodes).
    Ignored,
    /// A send was already in flight; this one had no effect.
    Rejected,
}

/// Incremental notifications emitted while a send is in flight, so a UI
/// can render progress without owning the stream.
#[derive(Debug)]
pub enum TurnNotice<'a> {
    /// Text appended to the streaming assistant message.
    Delta(&'a str),
    /// The agent invoked a tool.
    ToolCall { name: &'a str },
    /// A tool result arrived.
    ToolResult { name: Option<&'a str> },
    /// The round completed and history was replaced.
    RoundComplete,
    /// The round failed; the message is already rendered in the display.
    StreamError(&'a str),
}

/// Orchestrates one chat session.
pub struct SessionController {
    transport: Box<dyn AgentTransport>,
    graph: BoxGraphService,
    suggest: BoxSuggestService,
    history: ConversationHistory,
    display: DisplayReconciler,
    window: ContextWindow,
    pending: PendingNodes,
    panel: SuggestionPanel,
    state: SessionState,
}

impl SessionController {
    pub fn new(
        transport: impl AgentTransport + 'static,
        graph: BoxGraphService,
        suggest: BoxSuggestService,
        context_capacity: usize,
    ) -> Self {
        Self {
            transport: Box::new(transport),
            graph,
            suggest,
            history: ConversationHistory::new(),
            display: DisplayReconciler::new(),
            window: ContextWindow::new(context_capacity),
            pending: PendingNodes::new(),
            panel: SuggestionPanel::new(),
            state: SessionState::Idle,
        }
    }

    /// Seed the context window from the graph overview.
    ///
    /// A failed fetch only warns; the session starts with an empty window.
    pub async fn init(&mut self) {
        match self.graph.overview().await {
            Ok(overview) => {
                self.window.seed(overview.nodes);
                debug!(nodes = self.window.len(), "context window seeded");
            }
            Err(err) => {
                warn!(error = %err, "graph overview fetch failed, context window starts empty");
            }
        }
    }

    /// Send a user message and drive the response stream to exhaustion.
    ///
    /// No-op when both the trimmed text and the pending-node queue are
    /// empty; rejected when a send is already in flight.
    pub async fn send<F>(&mut self, text: &str, mut notify: F) -> SendOutcome
    where
        F: FnMut(TurnNotice<'_>),
    {
        let trimmed = text.trim();
        if trimmed.is_empty() && self.pending.is_empty() {
            return SendOutcome::Ignored;
        }
        if self.is_loading() {
            debug!("send rejected: request already in flight");
            return SendOutcome::Rejected;
        }
        self.state = SessionState::Sending;

        // Pending node references are inlined before the free text and
        // cleared immediately, before the request can fail.
        let content = self.pending.compose_content(trimmed);
        let user = ChatMessage::user(content);
        self.display.push_user(user.clone());
        self.panel.clear();

        let placeholder_id = Uuid::now_v7().to_string();
        self.display.push_placeholder(&placeholder_id);

        let mut messages = self.history.snapshot();
        messages.push(user);
        let mut events = self.transport.chat(ChatRequest { messages });
        self.state = SessionState::Streaming;

        let mut failed = false;
        while let Some(item) = events.next().await {
            match item {
                Ok(event) => {
                    self.notify_event(&event, &mut notify);
                    match self.display.apply(event) {
                        Applied::RoundCompleted(canonical) => {
                            self.history.replace(canonical);
                            failed = false;
                            self.refresh_post_round().await;
                            notify(TurnNotice::RoundComplete);
                        }
                        Applied::Errored(_) => {
                            // Application error: the server decides whether
                            // the stream continues; we keep consuming.
                            failed = true;
                        }
                        Applied::Delta | Applied::Completed => {}
                    }
                }
                Err(err) => {
                    let text = format!("Error: {err}");
                    self.display.fail_active(&text);
                    notify(TurnNotice::StreamError(&text));
                    failed = true;
                    break;
                }
            }
        }
        if failed {
            self.state = SessionState::Errored;
            SendOutcome::Errored
        } else {
            self.state = SessionState::Completed;
            SendOutcome::Completed
        }
    }

    /// Recover after an aborted send (e.g. the send future was dropped
    /// mid-stream): mark the dangling streaming message errored so the
    /// next send is accepted.
    pub fn abort(&mut self) {
        self.state = if self.display.fail_active("Error: request cancelled") {
            SessionState::Errored
        } else {
            SessionState::Idle
        };
    }

    /// Reset history, display list, collapse state, and suggestions.
    /// Idempotent, safe to call anytime.
    pub fn clear(&mut self) {
        self.history.clear();
        self.display.clear();
        self.panel.clear();
        self.state = SessionState::Idle;
    }

    /// Resolve full node detail for a clicked entity reference.
    ///
    /// A successful resolution counts as viewing the node and refreshes
    /// the context window. A failure degrades to a minimal stand-in so
    /// the UI never hangs.
    pub async fn resolve_node_reference(&mut self, id: &str) -> NodeDetail {
        match self.graph.node_detail(id).await {
            Ok(detail) => {
                self.window.add(ActiveNode::from(&detail.node));
                detail
            }
            Err(err) => {
                warn!(node_id = id, error = %err, "node detail fetch failed, using stand-in");
                NodeDetail::stand_in(id)
            }
        }
    }

    /// Attach a node to the next outbound message (and mark it active).
    pub fn attach_node(&mut self, node: ActiveNode) {
        self.window.add(node.clone());
        self.pending.push(node);
    }

    /// Idle-trigger refresh. Fires only when no user message exists yet
    /// and the context window is non-empty; returns whether a fetch ran.
    pub async fn idle_refresh(&mut self) -> bool {
        if self.history.has_user_message() || self.window.is_empty() {
            return false;
        }
        let request = recommend::idle_request(&self.window);
        let suggestions = recommend::fetch_suggestions(&self.suggest, request).await;
        self.panel.replace(suggestions);
        true
    }

    /// Select a suggestion for submission; clears the list.
    pub fn take_suggestion(&mut self, index: usize) -> Option<String> {
        self.panel.take(index)
    }

    pub fn display(&self) -> &[DisplayMessage] {
        self.display.messages()
    }

    /// Mutable access for UI-side collapse toggling.
    pub fn display_mut(&mut self) -> &mut DisplayReconciler {
        &mut self.display
    }

    pub fn history(&self) -> &[ChatMessage] {
        self.history.messages()
    }

    pub fn window(&self) -> &ContextWindow {
        &self.window
    }

    pub fn pending(&self) -> &PendingNodes {
        &self.pending
    }

    pub fn suggestions(&self) -> &SuggestionPanel {
        &self.panel
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether a send is in flight (the single-flight guard).
    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Sending | SessionState::Streaming)
    }

    async fn refresh_post_round(&mut self) {
        let request = recommend::post_round_request(self.history.messages());
        let suggestions = recommend::fetch_suggestions(&self.suggest, request).await;
        self.panel.replace(suggestions);
    }

    fn notify_event<F>(&self, event: &ChatStreamEvent, notify: &mut F)
    where
        F: FnMut(TurnNotice<'_>),
    {
        match event {
            ChatStreamEvent::MessageDelta { delta, .. } => notify(TurnNotice::Delta(delta)),
            ChatStreamEvent::MessageComplete { message, .. } => {
                if message.role == MessageRole::Tool {
                    notify(TurnNotice::ToolResult {
                        name: message.name.as_deref(),
                    });
                } else if let Some(calls) = &message.tool_calls {
                    for call in calls {
                        notify(TurnNotice::ToolCall { name: &call.name });
                    }
                }
            }
            ChatStreamEvent::Error { error } => notify(TurnNotice::StreamError(error)),
            ChatStreamEvent::RoundComplete { .. } => {}
        }
    }
}
