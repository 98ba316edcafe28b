//! HttpGraphService -- concrete [`GraphService`] over the graph API.
//!
//! `GET /api/graph/overview` for the session-start snapshot and
//! `GET /api/graph/node/{id}` for node detail. Node ids contain colons
//! (`doc:abc123`), which are legal path characters and passed through
//! unchanged.

use std::time::Duration;

use mnema_core::client::GraphService;
use mnema_types::error::GraphError;
use mnema_types::graph::{GraphOverview, NodeDetail};

/// Knowledge-graph lookups over HTTP.
pub struct HttpGraphService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGraphService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: super::build_client(timeout),
            base_url: super::trim_base_url(base_url.into()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        not_found: Option<&str>,
    ) -> Result<T, GraphError> {
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GraphError::Http(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            if let Some(id) = not_found {
                return Err(GraphError::NotFound(id.to_string()));
            }
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GraphError::Http(format!("HTTP {status}: {body}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GraphError::Deserialization(e.to_string()))
    }
}

impl GraphService for HttpGraphService {
    async fn overview(&self) -> Result<GraphOverview, GraphError> {
        self.get_json(self.url("/api/graph/overview"), None).await
    }

    async fn node_detail(&self, id: &str) -> Result<NodeDetail, GraphError> {
        self.get_json(self.url(&format!("/api/graph/node/{id}")), Some(id))
            .await
    }
}
