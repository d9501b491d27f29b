//! Upstream API key sources.
//!
//! The key is looked up on every request so that it can be rotated without a
//! restart.

use std::env;

/// Default environment variable holding the Gemini API key.
pub const DEFAULT_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Supplies the upstream API key at call time.
pub trait SecretSource: Send + Sync {
    /// Returns the key, or `None` when it is unset or empty.
    fn api_key(&self) -> Option<String>;
}

/// Reads the key from a process environment variable on each call.
#[derive(Debug, Clone)]
pub struct EnvSecret {
    var: String,
}

impl EnvSecret {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvSecret {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEY_VAR)
    }
}

impl SecretSource for EnvSecret {
    fn api_key(&self) -> Option<String> {
        env::var(&self.var).ok().filter(|v| !v.is_empty())
    }
}

/// A fixed key, mostly useful in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSecret(pub Option<String>);

impl StaticSecret {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Some(key.into()))
    }

    pub fn unset() -> Self {
        Self(None)
    }
}

impl SecretSource for StaticSecret {
    fn api_key(&self) -> Option<String> {
        self.0.clone().filter(|v| !v.is_empty())
    }
}
