//! Bounded, recency-ordered window of active graph entities.
//!
//! A classic MRU list, not a cache with expiry: nodes the user has viewed
//! or attached enter at the front, repeat references move to the front,
//! and the tail is evicted past capacity. Entries leave only via eviction
//! or an explicit clear. The window seeds both manual messages and
//! automatic recommendations.

use std::collections::VecDeque;

use mnema_types::graph::{ActiveNode, GraphNode};

/// Default number of active nodes retained per session.
pub const DEFAULT_CONTEXT_CAPACITY: usize = 10;

/// Recency-ordered collection of active graph entities.
#[derive(Debug)]
pub struct ContextWindow {
    entries: VecDeque<ActiveNode>,
    capacity: usize,
}

impl Default for ContextWindow {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_CAPACITY)
    }
}

impl ContextWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Record a node reference, most-recently-used first.
    ///
    /// No-op for nodes without an id. A repeat reference moves the
    /// existing entry to the front without growing the window; a new
    /// entry past capacity evicts the least-recently-used tail.
    pub fn add(&mut self, node: ActiveNode) {
        if node.id.is_empty() {
            return;
        }
        if let Some(index) = self.entries.iter().position(|n| n.id == node.id) {
            self.entries.remove(index);
        }
        self.entries.push_front(node);
        self.entries.truncate(self.capacity);
    }

    /// Pre-seed from the graph overview at session start.
    ///
    /// Nodes are inserted oldest-first so the newest ends up at the
    /// front after repeated `add`.
    pub fn seed(&mut self, mut nodes: Vec<GraphNode>) {
        nodes.sort_by_key(|n| n.created_at);
        for node in &nodes {
            self.add(ActiveNode::from(node));
        }
    }

    /// Entries, most-recent first.
    pub fn iter(&self) -> impl Iterator<Item = &ActiveNode> {
        self.entries.iter()
    }

    /// `label: desc` strings for recommendation context.
    pub fn context_strings(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|n| {
                if n.desc.is_empty() {
                    n.label.clone()
                } else {
                    format!("{}: {}", n.label, n.desc)
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mnema_types::graph::NodeKind;

    fn node(id: &str) -> ActiveNode {
        ActiveNode {
            id: id.to_string(),
            label: id.to_uppercase(),
            desc: String::new(),
        }
    }

    fn graph_node(id: &str, day: u32) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            kind: NodeKind::Doc,
            label: id.to_string(),
            desc: None,
            doc_type: None,
            created_at: Some(Utc.with_ymd_and_hms(2025, 6, day, 0, 0, 0).unwrap()),
        }
    }

    fn ids(window: &ContextWindow) -> Vec<&str> {
        window.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_add_inserts_at_front() {
        let mut window = ContextWindow::new(10);
        window.add(node("a"));
        window.add(node("b"));
        assert_eq!(ids(&window), vec!["b", "a"]);
    }

    #[test]
    fn test_capacity_evicts_tail() {
        let mut window = ContextWindow::new(2);
        window.add(node("a"));
        window.add(node("b"));
        window.add(node("c"));
        assert_eq!(ids(&window), vec!["c", "b"]);
    }

    #[test]
    fn test_repeat_add_moves_to_front_without_growth() {
        let mut window = ContextWindow::new(2);
        window.add(node("a"));
        window.add(node("b"));
        window.add(node("c"));
        window.add(node("b"));
        assert_eq!(ids(&window), vec!["b", "c"]);
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn test_window_is_last_capacity_distinct_ids() {
        let mut window = ContextWindow::new(3);
        for id in ["a", "b", "c", "a", "d", "e"] {
            window.add(node(id));
        }
        assert_eq!(ids(&window), vec!["e", "d", "a"]);
    }

    #[test]
    fn test_empty_id_is_noop() {
        let mut window = ContextWindow::new(2);
        window.add(node(""));
        assert!(window.is_empty());
    }

    #[test]
    fn test_seed_puts_newest_first() {
        let mut window = ContextWindow::new(10);
        window.seed(vec![
            graph_node("doc:new", 3),
            graph_node("doc:old", 1),
            graph_node("doc:mid", 2),
        ]);
        assert_eq!(ids(&window), vec!["doc:new", "doc:mid", "doc:old"]);
    }

    #[test]
    fn test_seed_respects_capacity() {
        let mut window = ContextWindow::new(2);
        window.seed(vec![
            graph_node("doc:a", 1),
            graph_node("doc:b", 2),
            graph_node("doc:c", 3),
        ]);
        assert_eq!(ids(&window), vec!["doc:c", "doc:b"]);
    }

    #[test]
    fn test_context_strings() {
        let mut window = ContextWindow::new(10);
        window.add(ActiveNode {
            id: "concept:rust".to_string(),
            label: "Rust".to_string(),
            desc: "a systems language".to_string(),
        });
        window.add(node("a"));
        assert_eq!(
            window.context_strings(),
            vec!["A".to_string(), "Rust: a systems language".to_string()]
        );
    }
}
