//! Rental request mail endpoint.
//!
//! `POST /api/send-rental-request` (mirrored at `POST /api`) takes a JSON
//! rental request, sends one email, and answers with a `{success, ...}`
//! envelope. Any failure, including a body that is not JSON, is a 500.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use tracing::error;

use backhoe_core::lead::RentalRequest;

use crate::state::AppState;

/// Build the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api", post(send_rental_request))
        .route("/api/send-rental-request", post(send_rental_request))
}

/// Response envelope of the mail endpoint.
#[derive(Debug, Serialize)]
struct MailResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl MailResponse {
    fn sent() -> (StatusCode, Json<Self>) {
        (
            StatusCode::OK,
            Json(Self {
                success: true,
                message: Some("Email sent successfully"),
                error: None,
            }),
        )
    }

    fn failed(reason: String) -> (StatusCode, Json<Self>) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(Self {
                success: false,
                message: None,
                error: Some(reason),
            }),
        )
    }
}

async fn send_rental_request(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> (StatusCode, Json<MailResponse>) {
    let request: RentalRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            error!(error = %e, "rejected rental request body");
            return MailResponse::failed(e.to_string());
        }
    };

    match state.leads.forward_rental(&request).await {
        Ok(_) => MailResponse::sent(),
        Err(e) => MailResponse::failed(e.to_string()),
    }
}
