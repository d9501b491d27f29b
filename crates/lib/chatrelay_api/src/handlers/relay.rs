//! Relay handler — forwards one chat message to Gemini and returns the reply.
//!
//! Single endpoint that:
//! 1. Reads `message` from the raw body when it is a JSON object
//! 2. Rejects a missing or blank message with `400 {"error": ...}`
//! 3. Reads the API key for this request; if unset, replies with guidance text
//! 4. Calls `generateContent` once and returns `{"response": ...}`
//!
//! Preflight and CORS headers are handled by router middleware.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use chatrelay_core::relay::{ChatRequest, ChatResponse, UNCONFIGURED_REPLY};
use chatrelay_core::upstream::GenerateOutcome;
use tracing::{info, warn};

use crate::AppState;
use crate::error::{AppError, AppResult};

/// `POST /relay` — relay a chat message to the upstream model.
///
/// The body is taken as raw bytes so that malformed JSON is reported like an
/// upstream failure rather than as an extractor rejection.
pub async fn relay_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<ChatResponse>> {
    let request = ChatRequest::from_json(&body)?;
    let message = request.usable_message().ok_or(AppError::MessageRequired)?;

    let Some(api_key) = state.secrets.api_key() else {
        warn!("upstream API key is not configured");
        return Ok(Json(ChatResponse::new(UNCONFIGURED_REPLY)));
    };

    let outcome = state.upstream.generate(&api_key, message).await?;
    if outcome == GenerateOutcome::Empty {
        warn!(model = %state.upstream.model(), "upstream returned no candidate text");
    } else {
        info!(model = %state.upstream.model(), "relayed chat message");
    }

    Ok(Json(ChatResponse::new(outcome.into_reply())))
}
