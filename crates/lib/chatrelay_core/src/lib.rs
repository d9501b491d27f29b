//! # chatrelay_core
//!
//! Core domain logic for the chat relay: wire types, the upstream Gemini
//! client, API key sources and conversation persistence.

pub mod conversations;
pub mod migrate;
pub mod relay;
pub mod secrets;
pub mod upstream;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
