//! Relay logic and port definitions for relaybot.
//!
//! This crate defines the "ports" (`TranscriptStore`, `IntentClassifier`)
//! that the infrastructure layer implements, and the `ConversationRelay`
//! that ties them together. It depends only on `relaybot-types` -- never on
//! `relaybot-infra` or any database/IO crate.

pub mod classifier;
pub mod relay;
pub mod transcript;
