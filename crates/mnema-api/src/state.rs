//! Application state for the CLI.
//!
//! Loads configuration once and hands out service instances bound to the
//! configured server.

use std::time::Duration;

use mnema_core::client::{BoxGraphService, BoxSuggestService};
use mnema_infra::config::{data_dir, load_client_config};
use mnema_infra::http::{HttpAgentTransport, HttpGraphService, HttpSuggestService};
use mnema_types::config::ClientConfig;

/// Shared CLI state: the resolved client configuration.
pub struct AppState {
    pub config: ClientConfig,
}

impl AppState {
    /// Load configuration, applying the `--server` override if given.
    pub async fn init(server_override: Option<String>) -> Self {
        let data_dir = data_dir();
        let mut config = load_client_config(&data_dir).await;
        if let Some(url) = server_override {
            config.server_url = url;
        }
        tracing::debug!(
            data_dir = %data_dir.display(),
            server = %config.server_url,
            "configuration loaded"
        );
        Self { config }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.request_timeout_secs)
    }

    /// Streaming chat transport bound to the configured server.
    pub fn agent_transport(&self) -> HttpAgentTransport {
        HttpAgentTransport::new(self.config.server_url.clone())
    }

    /// Graph lookup service bound to the configured server.
    pub fn graph_service(&self) -> BoxGraphService {
        BoxGraphService::new(HttpGraphService::new(
            self.config.server_url.clone(),
            self.timeout(),
        ))
    }

    /// Recommendation service bound to the configured server.
    pub fn suggest_service(&self) -> BoxSuggestService {
        BoxSuggestService::new(HttpSuggestService::new(
            self.config.server_url.clone(),
            self.timeout(),
        ))
    }
}
