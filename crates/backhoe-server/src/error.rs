//! HTTP error types for the Backhoe server.
//!
//! Every variant produces a JSON body with a machine-readable `error` field
//! and a human-readable `message`. The rental mail endpoint keeps its own
//! `{success, ...}` envelope and does not go through this type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Application-level error returned from HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Unknown category, state, or page.
    NotFound(String),
    /// Client sent invalid input.
    BadRequest(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
        };

        let body = ErrorBody {
            error: error_type,
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn not_found_is_json() {
        let response = AppError::NotFound("unknown category 'crane'".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "not_found");
        assert_eq!(json["message"], "unknown category 'crane'");
    }

    #[test]
    fn bad_request_status() {
        let response = AppError::BadRequest("unknown contact method 'fax'".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
