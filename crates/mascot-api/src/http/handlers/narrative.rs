//! The narrative self-introduction endpoint.
//!
//! POST /api/v1/persona/narrative
//!
//! Asks the utility model to write the persona's first-person
//! self-introduction from the merged profile tables. Useful for previewing
//! how the profile data reads as prose.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};
use tracing::error;

use mascot_types::llm::LlmError;

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /api/v1/persona/narrative -- generate the self-introduction.
pub async fn generate_narrative(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let narrative = state.generate_narrative().await.map_err(|e| {
        error!(error = %e, "narrative generation failed");
        match e {
            LlmError::Overloaded(_) => AppError::Overloaded,
            LlmError::InvalidRequest(msg) => AppError::Internal(msg),
            _ => AppError::Internal("narrative generation failed".to_string()),
        }
    })?;

    Ok(Json(json!({ "message": narrative })))
}
