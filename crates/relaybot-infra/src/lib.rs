//! Infrastructure layer for relaybot.
//!
//! Contains implementations of the port traits defined in `relaybot-core`:
//! the SQLite transcript store and the Dialogflow intent classifier, plus
//! the configuration file loader.

pub mod classifier;
pub mod config;
pub mod sqlite;
