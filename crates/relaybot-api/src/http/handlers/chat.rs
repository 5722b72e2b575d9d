//! Chat handler: one user message in, one bot reply out.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use crate::http::error::{AppError, MISSING_FIELDS};
use crate::state::AppState;

/// Request body for `POST /api/chat`.
///
/// Both fields are optional at the serde level so that a missing field
/// yields the same 400 body as an empty one.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(req) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected chat body");
        AppError::Validation(MISSING_FIELDS.to_string())
    })?;

    let (Some(message), Some(session_id)) = (req.message, req.session_id) else {
        return Err(AppError::Validation(MISSING_FIELDS.to_string()));
    };

    let reply = state.relay.handle_turn(&session_id, &message).await?;
    Ok(Json(ChatReply { reply }))
}
