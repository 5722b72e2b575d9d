//! Observability for relaybot: tracing subscriber setup and shutdown.

pub mod tracing_setup;
