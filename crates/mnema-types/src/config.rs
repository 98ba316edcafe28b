//! Client configuration for Mnema.
//!
//! `ClientConfig` represents the top-level `config.toml` in the data
//! directory. All fields have defaults so a missing file is fully usable.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Mnema client.
///
/// Loaded from `~/.mnema/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the knowledge-graph agent server.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Capacity of the active-node context window.
    #[serde(default = "default_context_capacity")]
    pub context_capacity: usize,

    /// Seconds of user inactivity before the idle recommendation fires.
    #[serde(default = "default_idle_delay_secs")]
    pub idle_delay_secs: u64,

    /// HTTP timeout for non-streaming requests, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_server_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_context_capacity() -> usize {
    10
}

fn default_idle_delay_secs() -> u64 {
    60
}

fn default_request_timeout_secs() -> u64 {
    300
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            context_capacity: default_context_capacity(),
            idle_delay_secs: default_idle_delay_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
