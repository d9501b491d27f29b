//! HTTP client for the relay endpoint.

use chatrelay_core::relay::ChatRequest;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Errors returned by [`RelayClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid relay URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Relay rejected the message: {0}")]
    Rejected(String),

    #[error("Unexpected relay response ({status}): {body}")]
    UnexpectedBody { status: u16, body: String },
}

/// Sends chat messages to a relay endpoint.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: Client,
    url: Url,
}

impl RelayClient {
    /// `url` is the full relay endpoint, e.g. `http://127.0.0.1:3100/relay`.
    pub fn new(url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http: Client::new(),
            url: url.parse()?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Sends one message and returns the displayable reply.
    ///
    /// The relay reports most failures as a `response` text (with a 500
    /// status), so `response` is returned whatever the status. Only a body
    /// carrying `error` is surfaced as [`ClientError::Rejected`].
    pub async fn send(&self, message: &str) -> Result<String, ClientError> {
        let resp = self
            .http
            .post(self.url.clone())
            .json(&ChatRequest::new(message))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        debug!(status = status.as_u16(), "relay replied");

        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
        if let Some(reply) = body.get("response").and_then(Value::as_str) {
            if !status.is_success() {
                warn!(status = status.as_u16(), "relay reported a failure");
            }
            return Ok(reply.to_string());
        }
        if let Some(error) = body.get("error").and_then(Value::as_str) {
            return Err(ClientError::Rejected(error.to_string()));
        }

        Err(ClientError::UnexpectedBody {
            status: status.as_u16(),
            body: text,
        })
    }
}
