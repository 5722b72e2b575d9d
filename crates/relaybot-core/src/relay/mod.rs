//! Conversation relay: one user turn in, one reply out, two turns logged.

pub mod service;
