//! HTTP clients for the knowledge-graph agent server.

pub mod agent;
pub mod graph;
pub mod suggest;

pub use agent::HttpAgentTransport;
pub use graph::HttpGraphService;
pub use suggest::HttpSuggestService;

use std::time::Duration;

/// Build the shared reqwest client with the configured timeout.
///
/// The timeout covers non-streaming requests; the chat stream uses its
/// own client without a total-request timeout, since a round legitimately
/// runs for minutes.
pub(crate) fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("failed to create reqwest client")
}

/// Normalize a configured base URL (drop trailing slashes).
pub(crate) fn trim_base_url(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
