//! Dialogflow ES intent classifier.

pub mod auth;
pub mod client;
pub mod types;

pub use auth::{AccessTokenSource, TokenSource};
pub use client::{DialogflowClassifier, DialogflowConfig};
