//! Error taxonomy for the conversation engine.
//!
//! Transport and service failures terminate the current round and are
//! rendered into the active streaming message; malformed protocol frames
//! are dropped inside the decoder and never surface here; dependency
//! failures (recommendations, node detail) degrade to empty results at
//! their call sites. Nothing in this module is retried.

use thiserror::Error;

/// Errors from the chat stream request/decode path.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Network failure or premature stream close.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status from the agent service.
    #[error("agent service error (HTTP {status}): {message}")]
    Service { status: u16, message: String },

    /// Unrecoverable decode failure (recoverable ones are dropped frames).
    #[error("decode error: {0}")]
    Decode(String),
}

/// Errors from the knowledge-graph service.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("graph request failed: {0}")]
    Http(String),

    #[error("node not found: {0}")]
    NotFound(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}
