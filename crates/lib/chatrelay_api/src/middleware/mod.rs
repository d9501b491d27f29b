//! Router-wide middleware.

pub mod cors;
