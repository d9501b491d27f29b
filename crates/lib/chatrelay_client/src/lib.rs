//! # chatrelay_client
//!
//! Client side of the chat relay: an HTTP client for the relay endpoint and a
//! [`ChatSession`] that persists each turn around the relay call.

pub mod relay_client;
pub mod session;

pub use relay_client::{ClientError, RelayClient};
pub use session::{ChatSession, SessionError, Turn};
