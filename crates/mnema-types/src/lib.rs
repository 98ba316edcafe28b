//! Shared domain types for Mnema.
//!
//! Wire schemas for the chat stream protocol and the knowledge-graph
//! service, plus the error taxonomy and client configuration. This crate
//! holds only data shapes and pure helpers -- no I/O.

pub mod config;
pub mod error;
pub mod event;
pub mod graph;
pub mod message;
pub mod node_ref;
