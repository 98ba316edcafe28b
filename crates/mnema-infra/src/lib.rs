//! Infrastructure implementations for Mnema.
//!
//! HTTP clients for the knowledge-graph agent server (chat stream, graph
//! lookups, recommendations) and `config.toml` loading. Everything here
//! implements a port trait defined in `mnema-core`.

pub mod config;
pub mod http;
