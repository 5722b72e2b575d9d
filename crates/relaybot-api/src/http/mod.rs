//! HTTP layer for relaybot.
//!
//! Axum router exposing `POST /api/chat` and `GET /health`, with CORS,
//! request tracing, and an optional static chat page.

pub mod error;
pub mod handlers;
pub mod router;
