//! Chat protocol implementation
//!
//! Handles command parsing, dispatch, and response generation.

pub mod commands;
pub mod handlers;

pub use commands::{Command, CommandResult, CommandStatus, parse_command};
pub use handlers::handle_command;

/// Version string sent in reply to the VERSION command.
pub const SERVER_VERSION: &str = "RAX Chat Server v0.1";
