use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use relaybot_core::transcript::store::TranscriptStore;

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /health
///
/// Reports the crate version and the number of stored turns. A store that
/// cannot be counted is reported as an internal error.
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let turns = state
        .relay
        .store()
        .count_turns()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "turns": turns,
    })))
}
