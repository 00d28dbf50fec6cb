//! Broadcast fan-out
//!
//! Writes a formatted message to every active slot in the locked table.
//! Delivery is best-effort: a write failure to one recipient is logged and
//! the remaining recipients still receive the message. Callers hold the
//! table lock for the whole fan-out, so recipients see a membership snapshot
//! consistent with a single point in time.

use log::{info, warn};
use tokio::io::AsyncWriteExt;

use crate::registry::table::{ClientTable, SlotId};

/// Sends a chat line from `sender` to every other active participant,
/// formatted as `[<name>] <text>`.
pub async fn broadcast_chat(table: &mut ClientTable, sender: SlotId, text: &str) {
    let name = match table.name_of(sender) {
        Some(name) => name.to_string(),
        None => return,
    };
    let message = format!("[{}] {}\n", name, text);

    for index in 0..table.capacity() {
        if index == sender.index() {
            continue;
        }
        send_to(table, index, &message).await;
    }
}

/// Announces a successful join: the joiner gets a welcome line, everyone
/// else is told who arrived.
pub async fn announce_join(table: &mut ClientTable, joiner: SlotId) {
    let name = match table.name_of(joiner) {
        Some(name) => name.to_string(),
        None => return,
    };
    let welcome = format!("Welcome to the chat room, {}!\n", name);
    let notice = format!("{} has joined the chat room\n", name);
    info!("{} has joined the chat room", name);

    for index in 0..table.capacity() {
        let line = if index == joiner.index() { &welcome } else { &notice };
        send_to(table, index, line).await;
    }
}

/// Announces a departure to every remaining active participant. The leaver's
/// slot has already been released by this point.
pub async fn announce_leave(table: &mut ClientTable, name: &str) {
    let notice = format!("{} has left the chat room\n", name);
    info!("{} has left the chat room", name);

    for index in 0..table.capacity() {
        send_to(table, index, &notice).await;
    }
}

/// Tells every active participant the server is going away.
pub async fn announce_shutdown(table: &mut ClientTable) {
    for index in 0..table.capacity() {
        send_to(table, index, "Server is shutting down\n").await;
    }
}

async fn send_to(table: &mut ClientTable, index: usize, line: &str) {
    if let Some(writer) = table.active_writer_at(index) {
        if let Err(e) = writer.write_all(line.as_bytes()).await {
            warn!("Failed to send to slot {}: {}", index, e);
        }
    }
}
