//! Google Gemini `generateContent` client.

use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{GenerateContentRequest, GenerateOutcome, UpstreamError};

/// Public Gemini API host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Thin client over `POST {base}/v1beta/models/{model}:generateContent`.
///
/// The API key is passed per call as the `key` query parameter and is never
/// stored on the client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    endpoint: Url,
    model: String,
}

impl GeminiClient {
    /// Builds a client with a fresh connection pool.
    pub fn new(base_url: &str, model: impl Into<String>) -> Result<Self, UpstreamError> {
        Self::with_client(Client::new(), base_url, model)
    }

    /// Builds a client sharing an existing `reqwest` pool.
    pub fn with_client(
        http: Client,
        base_url: &str,
        model: impl Into<String>,
    ) -> Result<Self, UpstreamError> {
        let model = model.into();
        let endpoint = generate_endpoint(base_url, &model)?;
        Ok(Self {
            http,
            endpoint,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Endpoint URL without the key parameter.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends one message and returns the first candidate's text.
    ///
    /// Non-2xx statuses, transport failures and non-JSON bodies are errors.
    /// A JSON body of an unexpected shape is [`GenerateOutcome::Empty`].
    pub async fn generate(
        &self,
        api_key: &str,
        message: &str,
    ) -> Result<GenerateOutcome, UpstreamError> {
        debug!(model = %self.model, chars = message.chars().count(), "calling generateContent");

        let resp = self
            .http
            .post(self.endpoint.clone())
            .query(&[("key", api_key)])
            .json(&GenerateContentRequest::from_text(message))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        let payload: Value = serde_json::from_slice(&bytes)?;
        Ok(GenerateOutcome::from_payload(&payload))
    }
}

/// `{base}/v1beta/models/{model}:generateContent`, keeping any path prefix on `base`.
fn generate_endpoint(base_url: &str, model: &str) -> Result<Url, UpstreamError> {
    let mut base: Url = base_url.parse()?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(&format!("v1beta/models/{model}:generateContent"))?)
}
