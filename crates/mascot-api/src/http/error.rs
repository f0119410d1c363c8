//! Application error type mapping to HTTP status codes.
//!
//! Errors surface to the widget as JSON `{ "error": "..." }` with the
//! persona's voice where the original failure is an upstream one: a
//! distinguished retry-later message for overload (503) and an in-character
//! apology for everything else (500). Validation failures are plain 400s.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// User-facing message for upstream overload.
pub const OVERLOADED_MESSAGE: &str =
    "The server is really busy right now. Please wait a moment and try again.";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request body or parameters (400).
    Validation(String),
    /// Upstream LLM overload (503) -- the one distinguished error class.
    Overloaded,
    /// Any other failure, already rendered in the persona's voice (500).
    Apology(String),
    /// Internal failure with a plain message (500).
    Internal(String),
}

/// Build the persona-voiced apology for a failed request.
pub fn apology(nickname: &str) -> String {
    format!(
        "So sorry! Something went really wrong while I was talking to my \
         brain... 😭 {nickname} can't chat right this second. Please try \
         again in a little while!"
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Overloaded => {
                (StatusCode::SERVICE_UNAVAILABLE, OVERLOADED_MESSAGE.to_string())
            }
            AppError::Apology(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = json!({ "error": message });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let response = AppError::Validation("messages must not be empty".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_overloaded_maps_to_503() {
        let response = AppError::Overloaded.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_apology_maps_to_500() {
        let response = AppError::Apology(apology("Northgate")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_apology_carries_nickname() {
        assert!(apology("Northgate").contains("Northgate"));
    }
}
