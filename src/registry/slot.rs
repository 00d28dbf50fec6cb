//! Module `slot`
//!
//! Defines one position in the client table. A slot is `Empty` until the
//! acceptor stores a connection's write half in it (`Reserved`), becomes
//! `Active` once a display name is recorded, and returns to `Empty` when the
//! occupant leaves or disconnects.

use std::net::SocketAddr;

use tokio::net::tcp::OwnedWriteHalf;

/// State of a single registry slot, derived from its fields: no write half
/// means `Empty`, a write half without a name means `Reserved`, both mean
/// `Active`. Only `Active` slots are visible to WHO and broadcasts.
pub struct ClientSlot {
    writer: Option<OwnedWriteHalf>,
    name: Option<String>,
    addr: Option<SocketAddr>,
}

impl ClientSlot {
    pub(crate) fn empty() -> Self {
        Self {
            writer: None,
            name: None,
            addr: None,
        }
    }

    /// Returns whether the slot is available for a new connection.
    pub fn is_empty(&self) -> bool {
        self.writer.is_none()
    }

    /// Returns whether the occupant has joined and is visible to WHO and
    /// broadcasts.
    pub fn is_active(&self) -> bool {
        self.writer.is_some() && self.name.is_some()
    }

    /// Returns the occupant's display name if one has been recorded.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the occupant's socket address while the slot is occupied.
    pub fn addr(&self) -> Option<SocketAddr> {
        self.addr
    }

    pub(crate) fn occupy(&mut self, writer: OwnedWriteHalf, addr: SocketAddr) {
        self.writer = Some(writer);
        self.addr = Some(addr);
        self.name = None;
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    pub(crate) fn writer_mut(&mut self) -> Option<&mut OwnedWriteHalf> {
        self.writer.as_mut()
    }

    /// Releases the slot. Dropping the write half closes the server's side
    /// of the connection. Returns the display name if the occupant had
    /// joined; calling this on an already-empty slot is a no-op.
    pub(crate) fn clear(&mut self) -> Option<String> {
        self.writer = None;
        self.addr = None;
        self.name.take()
    }
}
