//! Inline entity-reference tokens.
//!
//! Message text references graph nodes with `[[node:<id>|<label>]]`
//! (label optional, defaulting to the id). The agent's system prompt
//! instructs it to emit this exact syntax, and the renderer substitutes
//! tokens with plain styled labels rather than executing any markup.
//!
//! Node ids contain colons (`doc:abc123`), so parsing splits id from
//! label on the LAST pipe within the token, never on a colon.

use std::fmt;

const OPEN: &str = "[[node:";
const CLOSE: &str = "]]";

/// A parsed entity reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    pub id: String,
    pub label: String,
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_node_ref(&self.id, Some(&self.label)))
    }
}

/// Format an entity-reference token.
///
/// The label is flattened so the token stays parseable: pipes become
/// slashes and closing brackets become parens. An empty or missing label
/// falls back to the id.
pub fn format_node_ref(id: &str, label: Option<&str>) -> String {
    let label = match label {
        Some(l) if !l.trim().is_empty() => l,
        _ => id,
    };
    let label = label.replace('|', "/").replace(']', ")");
    format!("{OPEN}{id}|{label}{CLOSE}")
}

/// A segment of message text: either plain prose or an entity reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Node(NodeRef),
}

/// Split message text into prose and entity-reference segments.
///
/// Unterminated or empty-id tokens are left as plain text.
pub fn split_node_refs(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            break;
        };

        let body = &after_open[..end];
        let (id, label) = match body.rfind('|') {
            Some(pipe) => (&body[..pipe], &body[pipe + 1..]),
            None => (body, body),
        };

        if id.is_empty() {
            // Malformed token; emit up to and including it as text.
            let consumed = start + OPEN.len() + end + CLOSE.len();
            segments.push(Segment::Text(&rest[..consumed]));
            rest = &rest[consumed..];
            continue;
        }

        if start > 0 {
            segments.push(Segment::Text(&rest[..start]));
        }
        segments.push(Segment::Node(NodeRef {
            id: id.to_string(),
            label: if label.is_empty() { id } else { label }.to_string(),
        }));
        rest = &rest[start + OPEN.len() + end + CLOSE.len()..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Text(rest));
    }
    segments
}

/// All entity references in the text, in order of appearance.
pub fn parse_node_refs(text: &str) -> Vec<NodeRef> {
    split_node_refs(text)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Node(node_ref) => Some(node_ref),
            Segment::Text(_) => None,
        })
        .collect()
}
