//! Module `commands`
//!
//! Defines the chat command classification logic and the data structures
//! used to represent commands, their status, and results.

/// Represents one line received from a client.
///
/// Classification is prefix-based: a line starting with a command keyword is
/// that command, everything else is chat text. `JOIN` requires a trailing
/// space before its argument; the other keywords take no argument.
#[derive(Debug, PartialEq)]
pub enum Command {
    /// `JOIN <name>` - register a display name for this connection
    Join(String),
    /// `WHO` - list joined participants, one per line, then a blank line
    Who,
    /// `LEAVE` - announce departure and close the connection
    Leave,
    /// `VERSION` - report the server version
    Version,
    /// Anything else - broadcast to every other joined participant
    Chat(String),
}

/// Represents the outcome status of executing a command.
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Struct encapsulating the full result of a command execution.
pub struct CommandResult {
    pub status: CommandStatus,
    /// Reply for the issuing client only; broadcasts are written by the
    /// handlers themselves.
    pub message: Option<String>,
}

/// Classifies a raw line (line terminator already stripped) into a
/// `Command`.
///
/// The JOIN argument has leading spaces and tabs removed; trailing content
/// is kept verbatim, so display names may contain inner spaces.
pub fn parse_command(raw: &str) -> Command {
    if let Some(arg) = raw.strip_prefix("JOIN ") {
        return Command::Join(arg.trim_start_matches([' ', '\t']).to_string());
    }

    if raw.starts_with("WHO") {
        Command::Who
    } else if raw.starts_with("LEAVE") {
        Command::Leave
    } else if raw.starts_with("VERSION") {
        Command::Version
    } else {
        Command::Chat(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_requires_trailing_space() {
        assert_eq!(
            parse_command("JOIN alice"),
            Command::Join("alice".to_string())
        );
        // bare keyword is not a join; it falls through to chat text
        assert_eq!(parse_command("JOIN"), Command::Chat("JOIN".to_string()));
    }

    #[test]
    fn join_strips_leading_whitespace_from_name() {
        assert_eq!(
            parse_command("JOIN \t  alice"),
            Command::Join("alice".to_string())
        );
    }

    #[test]
    fn join_keeps_inner_spaces() {
        assert_eq!(
            parse_command("JOIN alice smith"),
            Command::Join("alice smith".to_string())
        );
    }

    #[test]
    fn keywords_match_on_prefix() {
        assert_eq!(parse_command("WHO"), Command::Who);
        assert_eq!(parse_command("LEAVE"), Command::Leave);
        assert_eq!(parse_command("VERSION"), Command::Version);
    }

    #[test]
    fn anything_else_is_chat_text() {
        assert_eq!(
            parse_command("hello there"),
            Command::Chat("hello there".to_string())
        );
        assert_eq!(parse_command(""), Command::Chat(String::new()));
        // lowercase keywords are ordinary chat text
        assert_eq!(parse_command("who"), Command::Chat("who".to_string()));
    }
}
