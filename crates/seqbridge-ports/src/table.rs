//! Per-direction map from sequencer address to shadow port.
//!
//! Owned and mutated by the worker only. The realtime side never looks into a
//! table; it learns about liveness through the ports it was handed.

use crate::shadow::SharedPort;
use seqbridge_core::{Address, Direction, Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

pub struct PortTable<H> {
    direction: Direction,
    ports: HashMap<Address, SharedPort<H>>,
}

impl<H> PortTable<H> {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            ports: HashMap::new(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn lookup(&self, address: Address) -> Option<&SharedPort<H>> {
        self.ports.get(&address)
    }

    /// Mark the entry for `address` dead in place. Absent addresses are left absent.
    pub fn upsert_mark_dead(&mut self, address: Address) -> bool {
        match self.ports.get(&address) {
            Some(port) => {
                port.mark_dead();
                true
            }
            None => false,
        }
    }

    /// Fails with [`Error::DuplicatePort`] if `address` already has an entry.
    pub fn insert_new(&mut self, address: Address, port: SharedPort<H>) -> Result<()> {
        use std::collections::hash_map::Entry;
        match self.ports.entry(address) {
            Entry::Occupied(_) => Err(Error::DuplicatePort {
                direction: self.direction,
                address,
            }),
            Entry::Vacant(slot) => {
                slot.insert(port);
                Ok(())
            }
        }
    }

    pub fn remove(&mut self, address: Address) -> Option<SharedPort<H>> {
        self.ports.remove(&address)
    }

    /// Remove the entry only if it is `port` itself, not a newer port that
    /// reuses the same address.
    pub fn remove_if_same(&mut self, port: &SharedPort<H>) -> bool {
        let address = port.address();
        match self.ports.get(&address) {
            Some(entry) if Arc::ptr_eq(entry, port) => {
                self.ports.remove(&address);
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &SharedPort<H>)> {
        self.ports.iter()
    }
}

impl<H> std::fmt::Debug for PortTable<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortTable")
            .field("direction", &self.direction)
            .field("len", &self.ports.len())
            .finish()
    }
}
