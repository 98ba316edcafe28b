//! Streaming conversation engine for Mnema.
//!
//! This crate defines the engine proper -- stream decoding, display
//! reconciliation, the canonical history store, the context window,
//! the recommendation scheduler, and the session controller -- plus the
//! "ports" (service traits) that the infrastructure layer implements.
//! It depends only on `mnema-types`, never on any HTTP or terminal crate.

pub mod client;
pub mod context;
pub mod recommend;
pub mod session;
pub mod stream;
