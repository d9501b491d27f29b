//! API server configuration.

use chatrelay_core::secrets::DEFAULT_API_KEY_VAR;
use chatrelay_core::upstream::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Configuration for the API server.
///
/// The upstream API key is deliberately absent: it is read from the
/// environment on every request (see [`chatrelay_core::secrets::EnvSecret`]).
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3100").
    pub bind_addr: String,
    /// Base URL of the Gemini API.
    pub upstream_base_url: String,
    /// Gemini model name.
    pub model: String,
    /// Environment variable holding the Gemini API key.
    pub api_key_var: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3100".into(),
            upstream_base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            api_key_var: DEFAULT_API_KEY_VAR.into(),
        }
    }
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable              | Default                                      |
    /// |-----------------------|----------------------------------------------|
    /// | `BIND_ADDR`           | `127.0.0.1:3100`                             |
    /// | `GEMINI_BASE_URL`     | `https://generativelanguage.googleapis.com`  |
    /// | `GEMINI_MODEL`        | `gemini-1.5-flash`                           |
    /// | `GEMINI_API_KEY_VAR`  | `GEMINI_API_KEY`                             |
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ApiConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            upstream_base_url: lookup("GEMINI_BASE_URL").unwrap_or(defaults.upstream_base_url),
            model: lookup("GEMINI_MODEL").unwrap_or(defaults.model),
            api_key_var: lookup("GEMINI_API_KEY_VAR").unwrap_or(defaults.api_key_var),
        }
    }
}
