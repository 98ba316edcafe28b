//! Observability setup for Mnema.

pub mod tracing_setup;
