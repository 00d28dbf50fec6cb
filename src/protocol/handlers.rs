//! Command handlers module for the chat server.
//!
//! This module defines handler functions for chat commands. Handlers run
//! with the client table lock held, mutate membership, and perform broadcast
//! writes; the reply in the returned `CommandResult` goes only to the
//! issuing client.

use log::info;

use crate::config::ServerConfig;
use crate::protocol::{Command, CommandResult, CommandStatus, SERVER_VERSION};
use crate::registry::{ClientTable, SlotId, broadcast};

/// Dispatches a received command to its corresponding handler.
///
/// The session's join state lives in the table itself: a slot without a name
/// has not joined, and every handler except JOIN requires a name.
pub async fn handle_command(
    table: &mut ClientTable,
    slot: SlotId,
    command: &Command,
    config: &ServerConfig,
) -> CommandResult {
    match command {
        Command::Join(name) => handle_cmd_join(table, slot, name, config).await,
        Command::Who => handle_cmd_who(table, slot),
        Command::Leave => handle_cmd_leave(table, slot).await,
        Command::Version => handle_cmd_version(table, slot),
        Command::Chat(text) => handle_cmd_chat(table, slot, text).await,
    }
}

/// Handles the JOIN command: records the display name and announces the
/// arrival, or rejects a second JOIN and invalid names.
async fn handle_cmd_join(
    table: &mut ClientTable,
    slot: SlotId,
    name: &str,
    config: &ServerConfig,
) -> CommandResult {
    if let Some(existing) = table.name_of(slot) {
        return CommandResult {
            status: CommandStatus::Failure("Already joined".into()),
            message: Some(format!("Already joined as {}\n", existing)),
        };
    }

    if !is_valid_name(name, config.max_name_length) {
        return CommandResult {
            status: CommandStatus::Failure("Invalid name".into()),
            message: Some(format!(
                "Invalid name. Names are 1 to {} characters\n",
                config.max_name_length
            )),
        };
    }

    match table.join(slot, name.to_string()) {
        Ok(()) => {
            broadcast::announce_join(table, slot).await;
            CommandResult {
                status: CommandStatus::Success,
                message: None,
            }
        }
        Err(e) => CommandResult {
            status: CommandStatus::Failure(e.to_string()),
            message: Some(format!("{}\n", e)),
        },
    }
}

/// Handles the WHO command: replies with one name per line in slot order,
/// terminated by a blank line.
fn handle_cmd_who(table: &ClientTable, slot: SlotId) -> CommandResult {
    if !table.is_active(slot) {
        return join_first();
    }

    let mut listing = table.enumerate().join("\n");
    listing.push_str("\n\n");

    CommandResult {
        status: CommandStatus::Success,
        message: Some(listing),
    }
}

/// Handles the LEAVE command: releases the slot, announces the departure to
/// the remaining participants, and signals connection close.
async fn handle_cmd_leave(table: &mut ClientTable, slot: SlotId) -> CommandResult {
    if !table.is_active(slot) {
        return join_first();
    }

    if let Some(name) = table.leave(slot) {
        broadcast::announce_leave(table, &name).await;
    }

    CommandResult {
        status: CommandStatus::CloseConnection,
        message: None,
    }
}

/// Handles the VERSION command: replies with the server version string.
fn handle_cmd_version(table: &ClientTable, slot: SlotId) -> CommandResult {
    if !table.is_active(slot) {
        return join_first();
    }

    info!("{}", SERVER_VERSION);

    CommandResult {
        status: CommandStatus::Success,
        message: Some(format!("{}\n", SERVER_VERSION)),
    }
}

/// Handles chat text: broadcasts `[<name>] <text>` to every other joined
/// participant. Empty lines are dropped.
async fn handle_cmd_chat(table: &mut ClientTable, slot: SlotId, text: &str) -> CommandResult {
    if !table.is_active(slot) {
        return join_first();
    }

    if !text.is_empty() {
        broadcast::broadcast_chat(table, slot, text).await;
    }

    CommandResult {
        status: CommandStatus::Success,
        message: None,
    }
}

fn join_first() -> CommandResult {
    CommandResult {
        status: CommandStatus::Failure("Not joined".into()),
        message: Some("Please join first: JOIN <name>\n".into()),
    }
}

/// Performs basic input sanitation on a display name.
fn is_valid_name(name: &str, max_length: usize) -> bool {
    !name.trim().is_empty() && name.len() <= max_length && !name.contains(['\r', '\n', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_validation_bounds() {
        assert!(is_valid_name("alice", 20));
        assert!(!is_valid_name("", 20));
        assert!(!is_valid_name("   ", 20));
        assert!(!is_valid_name("a-name-well-over-the-limit", 20));
        assert!(!is_valid_name("ali\0ce", 20));
    }
}
