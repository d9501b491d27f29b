//! Relay wire types and the fixed reply texts.
//!
//! Clients always render `response` as chat text, so every failure except a
//! missing message is reported through that field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error text for a request without a usable message.
pub const MESSAGE_REQUIRED: &str = "Message is required";

/// Reply used when the upstream answered but carried no candidate text.
pub const FALLBACK_REPLY: &str = "I'm sorry, I couldn't generate a response at this time.";

/// Reply used when the request could not be processed at all.
pub const APOLOGY_REPLY: &str =
    "I'm sorry, I encountered an error while processing your message. Please try again.";

/// Reply used when no upstream API key is configured.
pub const UNCONFIGURED_REPLY: &str = "The AI service is currently unavailable because it has not been configured. \
     An administrator needs to set the Gemini API key before chat replies can be generated.";

/// Inbound relay payload.
///
/// `message` is optional so that a missing field and an explicit `null` both
/// reach validation instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// Parses a raw relay body.
    ///
    /// Only a JSON object can carry `message`; any other non-null JSON value
    /// yields an empty request. `null`, invalid JSON and a non-string
    /// `message` are errors.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        match serde_json::from_slice::<Value>(body)? {
            Value::Object(mut fields) => Ok(Self {
                message: serde_json::from_value(
                    fields.remove("message").unwrap_or(Value::Null),
                )?,
            }),
            Value::Null => serde_json::from_value(Value::Null),
            _ => Ok(Self::default()),
        }
    }

    /// Returns the message when it contains anything besides whitespace.
    ///
    /// The returned text is untrimmed; only the emptiness check trims.
    pub fn usable_message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}

/// Successful (or displayable) relay reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

impl ChatResponse {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

/// Validation failure body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
