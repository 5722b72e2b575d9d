//! Shared domain types for relaybot.
//!
//! Turns, sessions, classifier results, configuration, and the error enums
//! shared by every layer.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod intent;
pub mod turn;
