//! Connection acceptor
//!
//! Binds the listening socket, reserves a registry slot for each accepted
//! connection, and spawns the session task. A full table rejects the
//! connection; per-connection failures never stop the accept loop.

use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::config::ServerConfig;
use crate::error::ChatServerError;
use crate::registry::{ClientTable, SharedTable, broadcast};
use crate::session::handle_session;

pub struct Server {
    table: SharedTable,
    listener: TcpListener,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Binds the listening socket. Bind failure is the only startup error
    /// that is fatal to the whole process; the caller decides how to exit.
    pub async fn bind(config: ServerConfig, port: u16) -> Result<Self, ChatServerError> {
        let socket = config.listen_socket(port);
        let listener = TcpListener::bind(&socket).await?;
        info!("Server bound to {}", listener.local_addr()?);

        Ok(Self {
            table: Arc::new(Mutex::new(ClientTable::with_capacity(config.max_clients))),
            listener,
            config: Arc::new(config),
        })
    }

    /// Address the server is actually listening on.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until a shutdown signal arrives, then announces
    /// the shutdown and closes every session's connection so they drain.
    pub async fn run(self) {
        info!(
            "Starting chat server (max {} clients)",
            self.config.max_clients
        );

        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => self.accept_client(stream, addr).await,
                    Err(e) => error!("Error accepting connection: {}", e),
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received, closing sessions");
                    break;
                }
            }
        }

        let mut table = self.table.lock().await;
        broadcast::announce_shutdown(&mut table).await;
        table.close_all();
        info!("Server stopped");
    }

    async fn accept_client(&self, stream: TcpStream, addr: SocketAddr) {
        let (read_half, write_half) = stream.into_split();

        let mut table = self.table.lock().await;
        if table.is_full() {
            drop(table);
            warn!(
                "Rejecting connection from {}: all {} slots occupied",
                addr, self.config.max_clients
            );
            let mut writer = write_half;
            let _ = writer
                .write_all(b"Server is full. Try again later.\n")
                .await;
            return;
        }

        match table.reserve(write_half, addr) {
            Ok(slot) => {
                info!(
                    "Accepted connection from {} into slot {} ({}/{} clients)",
                    addr,
                    slot,
                    table.occupied(),
                    table.capacity()
                );
                drop(table);

                let table = Arc::clone(&self.table);
                let config = Arc::clone(&self.config);

                // Spawn a task per client so the accept loop never blocks
                tokio::spawn(async move {
                    handle_session(table, slot, read_half, addr, config).await;
                });
            }
            // full table is handled above
            Err(e) => error!("Failed to reserve slot for {}: {}", addr, e),
        }
    }
}
