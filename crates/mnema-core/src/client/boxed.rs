//! Object-safe dynamic dispatch wrappers for the service ports.
//!
//! The RPITIT traits cannot be used as trait objects directly, so each
//! gets the same treatment:
//! 1. an object-safe `*Dyn` shadow trait with boxed futures
//! 2. a blanket impl of the shadow trait for every implementor
//! 3. a `Box*` wrapper that delegates
//!
//! The session controller holds the `Box*` forms so the CLI (or tests)
//! can inject any implementation at runtime.

use std::future::Future;
use std::pin::Pin;

use mnema_types::error::GraphError;
use mnema_types::graph::{GraphOverview, NodeDetail, Suggestion, SuggestionRequest};

use super::{GraphService, SuggestService};

/// Object-safe version of [`GraphService`] with boxed futures.
pub trait GraphServiceDyn: Send + Sync {
    fn overview_boxed(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<GraphOverview, GraphError>> + Send + '_>>;

    fn node_detail_boxed<'a>(
        &'a self,
        id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<NodeDetail, GraphError>> + Send + 'a>>;
}

impl<T: GraphService> GraphServiceDyn for T {
    fn overview_boxed(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<GraphOverview, GraphError>> + Send + '_>> {
        Box::pin(self.overview())
    }

    fn node_detail_boxed<'a>(
        &'a self,
        id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<NodeDetail, GraphError>> + Send + 'a>> {
        Box::pin(self.node_detail(id))
    }
}

/// Type-erased graph service.
pub struct BoxGraphService {
    inner: Box<dyn GraphServiceDyn + Send + Sync>,
}

impl BoxGraphService {
    pub fn new<T: GraphService + 'static>(service: T) -> Self {
        Self {
            inner: Box::new(service),
        }
    }

    pub async fn overview(&self) -> Result<GraphOverview, GraphError> {
        self.inner.overview_boxed().await
    }

    pub async fn node_detail(&self, id: &str) -> Result<NodeDetail, GraphError> {
        self.inner.node_detail_boxed(id).await
    }
}

/// Object-safe version of [`SuggestService`] with boxed futures.
pub trait SuggestServiceDyn: Send + Sync {
    fn suggest_boxed(
        &self,
        request: SuggestionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Suggestion>, GraphError>> + Send + '_>>;
}

impl<T: SuggestService> SuggestServiceDyn for T {
    fn suggest_boxed(
        &self,
        request: SuggestionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Suggestion>, GraphError>> + Send + '_>> {
        Box::pin(self.suggest(request))
    }
}

/// Type-erased suggestion service.
pub struct BoxSuggestService {
    inner: Box<dyn SuggestServiceDyn + Send + Sync>,
}

impl BoxSuggestService {
    pub fn new<T: SuggestService + 'static>(service: T) -> Self {
        Self {
            inner: Box::new(service),
        }
    }

    pub async fn suggest(
        &self,
        request: SuggestionRequest,
    ) -> Result<Vec<Suggestion>, GraphError> {
        self.inner.suggest_boxed(request).await
    }
}
