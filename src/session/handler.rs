//! Session handler
//!
//! Reads newline-terminated lines from one connection, dispatches them, and
//! guarantees the slot is released on every exit path: LEAVE, clean close,
//! read error, and idle timeout all funnel through the same cleanup.

use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::time::timeout;

use crate::config::ServerConfig;
use crate::protocol::{CommandStatus, handle_command, parse_command};
use crate::registry::{ClientTable, SharedTable, SlotId, broadcast};

/// Runs the protocol loop for one connection. The session owns the read
/// half; the write half lives in the slot so broadcasts from other sessions
/// can reach this client under the table lock.
pub async fn handle_session(
    table: SharedTable,
    slot: SlotId,
    read_half: OwnedReadHalf,
    client_addr: SocketAddr,
    config: Arc<ServerConfig>,
) {
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    loop {
        line.clear();
        let read = match config.idle_timeout() {
            Some(limit) => match timeout(limit, reader.read_line(&mut line)).await {
                Ok(result) => result,
                Err(_) => {
                    info!(
                        "Client {} idle for {}s, disconnecting",
                        client_addr, config.idle_timeout_secs
                    );
                    break;
                }
            },
            None => reader.read_line(&mut line).await,
        };

        match read {
            Ok(0) => {
                info!("Connection closed by client {}", client_addr);
                break;
            }
            Ok(_) => {
                if line.len() > config.max_message_length {
                    let mut table_guard = table.lock().await;
                    reply(&mut table_guard, slot, "Message too long\n").await;
                    continue;
                }

                let trimmed = line.trim_end_matches(['\r', '\n']);
                let command = parse_command(trimmed);

                let mut table_guard = table.lock().await;
                let result = handle_command(&mut table_guard, slot, &command, &config).await;

                if let Some(msg) = result.message {
                    reply(&mut table_guard, slot, &msg).await;
                }

                if let CommandStatus::CloseConnection = result.status {
                    info!("Client {} left the session", client_addr);
                    break;
                }
            }
            Err(e) => {
                error!("Failed to read from {}: {}", client_addr, e);
                break;
            }
        }
    }

    disconnect(&table, slot, client_addr).await;
}

/// Writes a reply line to this session's own connection.
async fn reply(table: &mut ClientTable, slot: SlotId, msg: &str) {
    if let Some(writer) = table.writer_for(slot) {
        if let Err(e) = writer.write_all(msg.as_bytes()).await {
            warn!("Failed to write reply to slot {}: {}", slot, e);
        }
    }
}

/// The single cleanup path: reclaims the slot and, if the client had
/// joined, announces the departure. Safe to reach after an explicit LEAVE
/// already released the slot.
async fn disconnect(table: &SharedTable, slot: SlotId, client_addr: SocketAddr) {
    let mut table = table.lock().await;
    if let Some(name) = table.leave(slot) {
        broadcast::announce_leave(&mut table, &name).await;
    }
    info!("Client {} disconnected", client_addr);
}
