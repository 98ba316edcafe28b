//! Service port definitions.
//!
//! These are the traits the infrastructure layer implements: the chat
//! stream transport, the knowledge-graph service, and the recommendation
//! service. `GraphService` and `SuggestService` use native async fn in
//! traits (RPITIT, Rust 2024 edition); `AgentTransport` returns a boxed
//! stream and is therefore object-safe as written.

pub mod boxed;

use std::pin::Pin;

use futures_util::Stream;

use mnema_types::error::{ChatError, GraphError};
use mnema_types::event::{ChatRequest, ChatStreamEvent};
use mnema_types::graph::{GraphOverview, NodeDetail, Suggestion, SuggestionRequest};

pub use boxed::{BoxGraphService, BoxSuggestService};

/// Transport for the streaming chat endpoint.
///
/// One call issues one request; the returned stream is a strictly
/// sequential consumer of that response body and must not be shared
/// across requests. Dropping the stream aborts the read.
pub trait AgentTransport: Send + Sync {
    fn chat(
        &self,
        request: ChatRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<ChatStreamEvent, ChatError>> + Send + 'static>>;
}

/// Knowledge-graph lookups.
///
/// Implementations live in mnema-infra (e.g., `HttpGraphService`).
pub trait GraphService: Send + Sync {
    /// Full graph snapshot; used once at session start to seed the
    /// context window.
    fn overview(
        &self,
    ) -> impl std::future::Future<Output = Result<GraphOverview, GraphError>> + Send;

    /// Node detail with recommendations; used on node-reference clicks.
    fn node_detail(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<NodeDetail, GraphError>> + Send;
}

/// Follow-up prompt recommendations.
pub trait SuggestService: Send + Sync {
    fn suggest(
        &self,
        request: SuggestionRequest,
    ) -> impl std::future::Future<Output = Result<Vec<Suggestion>, GraphError>> + Send;
}
