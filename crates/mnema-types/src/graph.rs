//! Knowledge-graph service contract types.
//!
//! Mirrors the graph server's overview / node-detail / recommendation
//! schemas. Mnema never stores these -- they are fetched per session and
//! cached only in the context window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Doc,
    Concept,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Doc => write!(f, "doc"),
            NodeKind::Concept => write!(f, "concept"),
        }
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "doc" => Ok(NodeKind::Doc),
            "concept" => Ok(NodeKind::Concept),
            other => Err(format!("invalid node kind: '{other}'")),
        }
    }
}

/// A document or concept node as the graph server reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Document title or concept name.
    pub label: String,
    /// Document summary or concept description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// For documents: the source format (pdf, md, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Kind of a graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Mentions,
    Related,
}

/// A relationship between two graph nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

/// Complete graph snapshot, fetched once at session start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphOverview {
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

/// Node detail with related-node recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDetail {
    pub node: GraphNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_content: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<GraphNode>,
}

impl NodeDetail {
    /// Minimal stand-in used when node resolution fails, so the UI never
    /// hangs on a broken reference.
    pub fn stand_in(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            node: GraphNode {
                id: id.clone(),
                kind: if id.starts_with("concept:") {
                    NodeKind::Concept
                } else {
                    NodeKind::Doc
                },
                label: id,
                desc: None,
                doc_type: None,
                created_at: None,
            },
            full_content: None,
            recommendations: Vec::new(),
        }
    }
}

/// Session-local reference to a graph entity the user has viewed or
/// attached. Purely a recency-cache entry, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveNode {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub desc: String,
}

impl From<&GraphNode> for ActiveNode {
    fn from(node: &GraphNode) -> Self {
        Self {
            id: node.id.clone(),
            label: node.label.clone(),
            desc: node.desc.clone().unwrap_or_default(),
        }
    }
}

/// A role/content pair sent as recommendation context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionMessage {
    pub role: String,
    pub content: String,
}

/// Body of a recommendation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionRequest {
    pub messages: Vec<SuggestionMessage>,
    pub context: Vec<String>,
}

/// One suggested follow-up prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
}

/// Response to a recommendation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionResponse {
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_roundtrip() {
        for kind in [NodeKind::Doc, NodeKind::Concept] {
            let s = kind.to_string();
            let parsed: NodeKind = s.parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_graph_node_deserialize_server_shape() {
        let json = r#"{"id":"doc:abc123","type":"doc","label":"Example Doc","desc":"A summary","doc_type":"pdf","created_at":"2025-06-01T12:00:00Z"}"#;
        let node: GraphNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.id, "doc:abc123");
        assert_eq!(node.kind, NodeKind::Doc);
        assert!(node.created_at.is_some());
    }

    #[test]
    fn test_concept_node_minimal() {
        let json = r#"{"id":"concept:rust","type":"concept","label":"Rust"}"#;
        let node: GraphNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.kind, NodeKind::Concept);
        assert!(node.desc.is_none());
        assert!(node.created_at.is_none());
    }

    #[test]
    fn test_stand_in_detail_infers_kind() {
        let detail = NodeDetail::stand_in("concept:machine_learning");
        assert_eq!(detail.node.kind, NodeKind::Concept);
        assert_eq!(detail.node.label, "concept:machine_learning");
        assert!(detail.recommendations.is_empty());

        let detail = NodeDetail::stand_in("doc:abc");
        assert_eq!(detail.node.kind, NodeKind::Doc);
    }

    #[test]
    fn test_active_node_from_graph_node() {
        let node = GraphNode {
            id: "concept:rust".to_string(),
            kind: NodeKind::Concept,
            label: "Rust".to_string(),
            desc: Some("a systems language".to_string()),
            doc_type: None,
            created_at: None,
        };
        let active = ActiveNode::from(&node);
        assert_eq!(active.id, "concept:rust");
        assert_eq!(active.desc, "a systems language");
    }

    #[test]
    fn test_suggestion_response_defaults_empty() {
        let resp: SuggestionResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.suggestions.is_empty());
    }

    #[test]
    fn test_suggestion_request_wire_form() {
        let request = SuggestionRequest {
            messages: vec![SuggestionMessage {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
            context: vec!["Rust: a systems language".to_string()],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""messages":[{"role":"user","content":"hi"}]"#));
        assert!(json.contains(r#""context":["Rust: a systems language"]"#));
    }
}
