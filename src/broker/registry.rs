//! Server registry
//!
//! A fixed arena of `MAX_SERVERS` slots allocated once when the broker is built.
//! Lookups scan the arena for an active slot carrying the requested id; the table
//! is small enough that the scan is never a hot path.

use std::fmt;

use super::queue::InboundQueue;
use super::{Handler, MAX_SERVERS};
use crate::utils::error::{BrokerError, Result};

/// One registration slot: the server's handler, inbound queue and counters.
#[derive(Default)]
pub struct ServerSlot {
    pub id: u16,
    pub active: bool,
    pub handler: Option<Handler>,
    pub queue: InboundQueue,
    pub sent: u32,
    pub received: u32,
}

impl ServerSlot {
    fn reset(&mut self) {
        self.id = 0;
        self.active = false;
        self.handler = None;
        self.queue = InboundQueue::new();
        self.sent = 0;
        self.received = 0;
    }
}

impl fmt::Debug for ServerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerSlot")
            .field("id", &self.id)
            .field("active", &self.active)
            .field("has_handler", &self.handler.is_some())
            .field("pending", &self.queue.len())
            .field("sent", &self.sent)
            .field("received", &self.received)
            .finish()
    }
}

#[derive(Debug)]
pub struct ServerRegistry {
    slots: Box<[ServerSlot]>,
}

impl Default for ServerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerRegistry {
    pub fn new() -> Self {
        Self {
            slots: (0..MAX_SERVERS).map(|_| ServerSlot::default()).collect(),
        }
    }

    /// Index of the active slot registered under `server_id`.
    pub fn find(&self, server_id: u16) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.active && slot.id == server_id)
    }

    pub fn get(&self, server_id: u16) -> Option<&ServerSlot> {
        self.find(server_id).map(|index| &self.slots[index])
    }

    pub fn get_mut(&mut self, server_id: u16) -> Option<&mut ServerSlot> {
        self.find(server_id).map(|index| &mut self.slots[index])
    }

    pub fn slot_mut(&mut self, index: usize) -> &mut ServerSlot {
        &mut self.slots[index]
    }

    /// Installs a cleared registration for `server_id` in the first free slot.
    ///
    /// The caller rejects id `0` before reaching the table.
    pub fn register(&mut self, server_id: u16, handler: Option<Handler>) -> Result<()> {
        if self.find(server_id).is_some() {
            return Err(BrokerError::AlreadyExists {
                what: "server",
                id: server_id,
            });
        }

        let slot = self
            .slots
            .iter_mut()
            .find(|slot| !slot.active)
            .ok_or(BrokerError::NoMemory {
                table: "server",
                max: MAX_SERVERS,
            })?;

        slot.reset();
        slot.id = server_id;
        slot.handler = handler;
        slot.active = true;
        Ok(())
    }

    /// Marks the slot inactive. Anything still queued is abandoned.
    pub fn unregister(&mut self, server_id: u16) -> Result<usize> {
        let slot = self.get_mut(server_id).ok_or(BrokerError::NotFound {
            what: "server",
            id: server_id,
        })?;
        let abandoned = slot.queue.len();
        slot.active = false;
        slot.handler = None;
        Ok(abandoned)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.active).count()
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(ServerSlot::reset);
    }
}
