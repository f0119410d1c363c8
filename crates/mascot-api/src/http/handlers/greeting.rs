//! The seasonal greeting endpoint.
//!
//! POST /api/v1/greetings/seasonal
//!
//! Generates the dated seasonal one-liner on demand and refreshes the
//! per-day cache the chat prompt reads from.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde_json::{Value, json};
use tracing::error;

use mascot_types::llm::LlmError;

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /api/v1/greetings/seasonal -- generate the seasonal one-liner.
pub async fn seasonal_greeting(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let line = state.generate_seasonal(Utc::now()).await.map_err(|e| {
        error!(error = %e, "seasonal greeting generation failed");
        match e {
            LlmError::Overloaded(_) => AppError::Overloaded,
            LlmError::InvalidRequest(msg) => AppError::Internal(msg),
            _ => AppError::Internal("seasonal greeting generation failed".to_string()),
        }
    })?;

    Ok(Json(json!({ "message": line })))
}
