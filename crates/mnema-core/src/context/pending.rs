//! Pending node attachments.
//!
//! A transient queue, distinct from the context window: nodes the user
//! explicitly attaches are inlined into the *next* outbound message as
//! entity-reference tokens, then cleared after send.

use mnema_types::graph::ActiveNode;
use mnema_types::node_ref::format_node_ref;

/// Queue of nodes to inline into the next outbound message.
#[derive(Debug, Default)]
pub struct PendingNodes {
    nodes: Vec<ActiveNode>,
}

impl PendingNodes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a node for the next message. Duplicate ids are kept once.
    pub fn push(&mut self, node: ActiveNode) {
        if node.id.is_empty() || self.nodes.iter().any(|n| n.id == node.id) {
            return;
        }
        self.nodes.push(node);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Take all queued nodes, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<ActiveNode> {
        std::mem::take(&mut self.nodes)
    }

    /// Compose outbound content: reference tokens first, then the free
    /// text, separated by a blank line. The queue is emptied.
    pub fn compose_content(&mut self, text: &str) -> String {
        let nodes = self.drain();
        let refs = nodes
            .iter()
            .map(|n| format_node_ref(&n.id, Some(&n.label)))
            .collect::<Vec<_>>()
            .join("\n");

        match (refs.is_empty(), text.is_empty()) {
            (true, _) => text.to_string(),
            (false, true) => refs,
            (false, false) => format!("{refs}\n\n{text}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, label: &str) -> ActiveNode {
        ActiveNode {
            id: id.to_string(),
            label: label.to_string(),
            desc: String::new(),
        }
    }

    #[test]
    fn test_compose_prefixes_refs_before_text() {
        let mut pending = PendingNodes::new();
        pending.push(node("doc:1", "Paper"));
        let content = pending.compose_content("summarize");
        assert_eq!(content, "[[node:doc:1|Paper]]\n\nsummarize");
        assert!(pending.is_empty());
    }

    #[test]
    fn test_compose_without_text() {
        let mut pending = PendingNodes::new();
        pending.push(node("doc:1", "Paper"));
        assert_eq!(pending.compose_content(""), "[[node:doc:1|Paper]]");
    }

    #[test]
    fn test_compose_without_nodes() {
        let mut pending = PendingNodes::new();
        assert_eq!(pending.compose_content("hello"), "hello");
    }

    #[test]
    fn test_compose_multiple_nodes_one_per_line() {
        let mut pending = PendingNodes::new();
        pending.push(node("doc:1", "Paper"));
        pending.push(node("concept:rust", "Rust"));
        assert_eq!(
            pending.compose_content("compare"),
            "[[node:doc:1|Paper]]\n[[node:concept:rust|Rust]]\n\ncompare"
        );
    }

    #[test]
    fn test_push_dedupes_by_id() {
        let mut pending = PendingNodes::new();
        pending.push(node("doc:1", "Paper"));
        pending.push(node("doc:1", "Paper again"));
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_push_ignores_empty_id() {
        let mut pending = PendingNodes::new();
        pending.push(node("", "nothing"));
        assert!(pending.is_empty());
    }
}
