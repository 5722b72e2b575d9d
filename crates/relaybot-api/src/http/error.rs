//! Application error type mapping to HTTP status codes.
//!
//! Client errors echo their message. Downstream failures are logged with
//! full detail but answered with one generic message, so classifier or SQL
//! details never reach the chat surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use relaybot_types::error::RelayError;

/// Message returned for every downstream failure.
pub const GENERIC_FAILURE: &str = "Something went wrong with the chatbot service.";

/// Message returned when a required field is absent.
pub const MISSING_FIELDS: &str = "Message and sessionId are required.";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors from the conversation relay.
    Relay(RelayError),
    /// Malformed or incomplete request body.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<RelayError> for AppError {
    fn from(e: RelayError) -> Self {
        AppError::Relay(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Relay(RelayError::InvalidRequest(_)) => (
                StatusCode::BAD_REQUEST,
                "INVALID_REQUEST",
                MISSING_FIELDS.to_string(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
            }
            AppError::Relay(RelayError::ClassifierFailed(e)) => {
                error!(error = %e, "Intent classifier failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CLASSIFIER_FAILED",
                    GENERIC_FAILURE.to_string(),
                )
            }
            AppError::Relay(RelayError::StoreWriteFailed(e)) => {
                error!(error = %e, "Transcript write failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_WRITE_FAILED",
                    GENERIC_FAILURE.to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    GENERIC_FAILURE.to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
