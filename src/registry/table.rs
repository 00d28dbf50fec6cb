//! Client table
//!
//! Fixed-capacity table of participant slots, the single source of truth for
//! "who is present". The table itself is plain data; concurrent access goes
//! through [`SharedTable`], and every scan or update must hold that lock for
//! its full duration.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

use crate::error::RegistryError;
use crate::registry::slot::ClientSlot;

/// Identifies one slot in the table for the lifetime of a connection.
///
/// Only `reserve` creates these, so an id always indexes within capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotId(usize);

impl SlotId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared handle to the client table; one lock serializes all mutations and
/// enumerations.
pub type SharedTable = Arc<Mutex<ClientTable>>;

/// Bounded table of client slots
pub struct ClientTable {
    slots: Vec<ClientSlot>,
}

impl ClientTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| ClientSlot::empty()).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots currently holding a connection, joined or not.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.is_empty()).count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|slot| !slot.is_empty())
    }

    /// Claims the first empty slot for a new connection, storing its write
    /// half. Fails when every slot is occupied.
    pub fn reserve(
        &mut self,
        writer: OwnedWriteHalf,
        addr: SocketAddr,
    ) -> Result<SlotId, RegistryError> {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_empty() {
                slot.occupy(writer, addr);
                return Ok(SlotId(index));
            }
        }
        Err(RegistryError::Full)
    }

    /// Records the display name for a reserved slot, making it visible to
    /// WHO and broadcasts. Rejects a slot that already carries a name.
    pub fn join(&mut self, id: SlotId, name: String) -> Result<(), RegistryError> {
        let slot = &mut self.slots[id.index()];
        if let Some(existing) = slot.name() {
            return Err(RegistryError::AlreadyJoined(existing.to_string()));
        }
        slot.set_name(name);
        Ok(())
    }

    /// Releases a slot, closing the stored write half. Returns the display
    /// name if the occupant had joined. Idempotent: a second call on the
    /// same slot is a no-op returning `None`.
    pub fn leave(&mut self, id: SlotId) -> Option<String> {
        self.slots[id.index()].clear()
    }

    /// Snapshot of all joined display names, in slot order.
    pub fn enumerate(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter(|slot| slot.is_active())
            .filter_map(|slot| slot.name().map(str::to_string))
            .collect()
    }

    pub fn is_active(&self, id: SlotId) -> bool {
        self.slots[id.index()].is_active()
    }

    pub fn name_of(&self, id: SlotId) -> Option<&str> {
        self.slots[id.index()].name()
    }

    pub fn addr_of(&self, id: SlotId) -> Option<SocketAddr> {
        self.slots[id.index()].addr()
    }

    /// Write half of an occupied slot, joined or not. Used for direct
    /// replies to the slot's own occupant.
    pub(crate) fn writer_for(&mut self, id: SlotId) -> Option<&mut OwnedWriteHalf> {
        self.slots[id.index()].writer_mut()
    }

    /// Write half at `index` if that slot is active; broadcast fan-out walks
    /// the table with this.
    pub(crate) fn active_writer_at(&mut self, index: usize) -> Option<&mut OwnedWriteHalf> {
        let slot = self.slots.get_mut(index)?;
        if slot.is_active() { slot.writer_mut() } else { None }
    }

    /// Releases every slot, closing all connections. Used at shutdown.
    pub fn close_all(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::net::{TcpListener, TcpStream};

    // Slots hold real write halves, so each test entry builds one from a
    // loopback connection. The client-side stream is returned and must be
    // kept alive for the duration of the test.
    async fn connected_writer() -> (OwnedWriteHalf, SocketAddr, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let client = TcpStream::connect(listener.local_addr().unwrap()).await.unwrap();
        let (server_side, peer) = listener.accept().await.unwrap();
        let (_read, writer) = server_side.into_split();
        (writer, peer, client)
    }

    #[tokio::test]
    async fn reserve_fills_slots_in_order_and_rejects_when_full() {
        let mut table = ClientTable::with_capacity(2);
        let mut keep = Vec::new();

        let (writer, addr, client) = connected_writer().await;
        keep.push(client);
        assert_eq!(table.reserve(writer, addr).unwrap(), SlotId(0));

        let (writer, addr, client) = connected_writer().await;
        keep.push(client);
        assert_eq!(table.reserve(writer, addr).unwrap(), SlotId(1));
        assert!(table.is_full());

        let (writer, addr, client) = connected_writer().await;
        keep.push(client);
        assert_eq!(table.reserve(writer, addr), Err(RegistryError::Full));
    }

    #[tokio::test]
    async fn reserved_slot_is_invisible_until_join() {
        let mut table = ClientTable::with_capacity(4);
        let (writer, addr, _client) = connected_writer().await;
        let id = table.reserve(writer, addr).unwrap();

        assert!(!table.is_active(id));
        assert!(table.enumerate().is_empty());

        table.join(id, "alice".to_string()).unwrap();
        assert!(table.is_active(id));
        assert_eq!(table.enumerate(), vec!["alice".to_string()]);
    }

    #[tokio::test]
    async fn duplicate_join_is_rejected() {
        let mut table = ClientTable::with_capacity(4);
        let (writer, addr, _client) = connected_writer().await;
        let id = table.reserve(writer, addr).unwrap();

        table.join(id, "alice".to_string()).unwrap();
        assert_eq!(
            table.join(id, "bob".to_string()),
            Err(RegistryError::AlreadyJoined("alice".to_string()))
        );
        assert_eq!(table.enumerate(), vec!["alice".to_string()]);
    }

    #[tokio::test]
    async fn leave_is_idempotent_and_frees_the_slot() {
        let mut table = ClientTable::with_capacity(1);
        let (writer, addr, _client) = connected_writer().await;
        let id = table.reserve(writer, addr).unwrap();
        table.join(id, "alice".to_string()).unwrap();

        assert_eq!(table.leave(id), Some("alice".to_string()));
        assert!(table.enumerate().is_empty());
        assert_eq!(table.leave(id), None);

        // the freed slot is available to the next connection
        let (writer, addr, _client2) = connected_writer().await;
        assert_eq!(table.reserve(writer, addr).unwrap(), id);
    }

    #[tokio::test]
    async fn enumerate_returns_names_in_slot_order() {
        let mut table = ClientTable::with_capacity(4);
        let mut keep = Vec::new();

        let (writer, addr, client) = connected_writer().await;
        keep.push(client);
        let first = table.reserve(writer, addr).unwrap();
        let (writer, addr, client) = connected_writer().await;
        keep.push(client);
        let second = table.reserve(writer, addr).unwrap();

        // join in reverse order; enumeration still follows slot order
        table.join(second, "bob".to_string()).unwrap();
        table.join(first, "alice".to_string()).unwrap();
        assert_eq!(
            table.enumerate(),
            vec!["alice".to_string(), "bob".to_string()]
        );
    }
}
