//! Upstream generative-language provider.
//!
//! Only Google's `generateContent` API is supported. Each relay turn makes a
//! single call: no retry, no streaming, no conversation history.

pub mod gemini;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::relay::FALLBACK_REPLY;

pub use gemini::GeminiClient;

/// Errors raised while talking to the upstream provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Invalid upstream URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Upstream response parse error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// `generateContent` request envelope: `{"contents":[{"parts":[{"text":..}]}]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

impl GenerateContentRequest {
    /// Wraps a single user message.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: text.into() }],
            }],
        }
    }
}

/// Result of a successful upstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Text found at `candidates[0].content.parts[0].text`.
    Text(String),
    /// The payload had no usable candidate text.
    Empty,
}

impl GenerateOutcome {
    /// Reads the first candidate's first text part.
    ///
    /// Any other shape (missing keys, wrong types, empty text) is `Empty`
    /// rather than an error.
    pub fn from_payload(payload: &Value) -> Self {
        match payload
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
        {
            Some(text) if !text.is_empty() => Self::Text(text.to_string()),
            _ => Self::Empty,
        }
    }

    /// Chat text to return, substituting the fallback sentence for `Empty`.
    pub fn into_reply(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Empty => FALLBACK_REPLY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_envelope_nests_contents_and_parts() {
        let body = serde_json::to_value(GenerateContentRequest::from_text("Hello")).unwrap();
        assert_eq!(body, json!({"contents": [{"parts": [{"text": "Hello"}]}]}));
    }

    #[test]
    fn extracts_first_candidate_text() {
        let payload = json!({
            "candidates": [
                {"content": {"parts": [{"text": "Hi there!"}, {"text": "ignored"}]}},
                {"content": {"parts": [{"text": "second"}]}}
            ]
        });
        assert_eq!(
            GenerateOutcome::from_payload(&payload),
            GenerateOutcome::Text("Hi there!".into())
        );
    }

    #[test]
    fn malformed_shapes_are_empty() {
        let cases = [
            json!({}),
            json!({"candidates": []}),
            json!({"candidates": "nope"}),
            json!({"candidates": [{}]}),
            json!({"candidates": [{"content": {"parts": []}}]}),
            json!({"candidates": [{"content": {"parts": [{"text": 7}]}}]}),
            json!({"candidates": [{"content": {"parts": [{"text": ""}]}}]}),
            json!(null),
        ];
        for payload in cases {
            assert_eq!(
                GenerateOutcome::from_payload(&payload),
                GenerateOutcome::Empty,
                "payload: {payload}"
            );
        }
    }

    #[test]
    fn empty_outcome_becomes_fallback_reply() {
        assert_eq!(GenerateOutcome::Empty.into_reply(), FALLBACK_REPLY);
        assert_eq!(GenerateOutcome::Text("x".into()).into_reply(), "x");
    }
}
