//! Application error types.
//!
//! Only a missing message surfaces as an `error` body. Every other failure is
//! rendered as a displayable `response` so the chat UI can show it as-is.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chatrelay_core::relay::{APOLOGY_REPLY, ChatResponse, ErrorResponse, MESSAGE_REQUIRED};
use chatrelay_core::upstream::UpstreamError;
use thiserror::Error;
use tracing::error;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Message is required")]
    MessageRequired,

    #[error("Invalid request body: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::MessageRequired => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: MESSAGE_REQUIRED.to_string(),
                }),
            )
                .into_response(),
            AppError::InvalidPayload(_) | AppError::Upstream(_) => {
                error!(error = %self, "relay request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ChatResponse::new(APOLOGY_REPLY)),
                )
                    .into_response()
            }
        }
    }
}
