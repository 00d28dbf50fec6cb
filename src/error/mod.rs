//! Error handling
//!
//! Defines error types for the chat server.

pub mod types;

pub use types::*;
