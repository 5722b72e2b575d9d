//! Transcript persistence abstraction.
//!
//! The infrastructure layer implements `TranscriptStore` for the durable,
//! append-only turn log.

pub mod store;
