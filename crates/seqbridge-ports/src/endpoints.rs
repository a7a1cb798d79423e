//! Realtime-side ends of the port worker's channels.
//!
//! - Address announcements: realtime (producer) -> worker (consumer)
//! - Retirements: realtime (producer) -> worker (consumer)
//! - New ports, one channel per direction: worker (producer) -> realtime (consumer)
//!
//! Every method is lock-free and allocation-free.

use crate::shadow::{AdoptedPort, SharedPort};
use seqbridge_core::{Address, Direction, RingConsumer, RingProducer, Waker};

pub struct RealtimeEndpoints<H> {
    pub(crate) addresses: RingProducer<Address>,
    pub(crate) deletions: RingProducer<SharedPort<H>>,
    pub(crate) announcements: [RingConsumer<SharedPort<H>>; 2],
    pub(crate) waker: Waker,
}

impl<H> RealtimeEndpoints<H> {
    /// RT-safe. Report that the port at `address` appeared or changed.
    ///
    /// Returns `false` if the channel is full; the announcement is dropped.
    #[inline]
    pub fn announce(&mut self, address: Address) -> bool {
        if self.addresses.try_write(address).is_err() {
            return false;
        }
        self.waker.post();
        true
    }

    /// RT-safe. Hand `port` to the worker for destruction.
    ///
    /// If the channel is full the port is returned so the caller can keep it
    /// and retry on a later cycle.
    #[inline]
    pub fn retire(&mut self, port: AdoptedPort<H>) -> Result<(), AdoptedPort<H>> {
        self.deletions
            .try_write(port.into_shared())
            .map_err(AdoptedPort::new)?;
        self.waker.post();
        Ok(())
    }

    /// RT-safe. Ports the worker created since the last call.
    ///
    /// Once the bridge is stopping every port is already dead; adopted ports
    /// should then be retired (or dropped) so the worker can free them.
    #[inline]
    pub fn adopt_new_ports(
        &mut self,
        direction: Direction,
    ) -> impl Iterator<Item = AdoptedPort<H>> + '_ {
        self.announcements[direction.index()]
            .read_available()
            .map(AdoptedPort::new)
    }

    /// Number of ports waiting to be adopted for `direction`.
    pub fn pending_ports(&self, direction: Direction) -> usize {
        self.announcements[direction.index()].len()
    }

    /// Wake the worker without enqueueing anything.
    pub fn waker(&self) -> &Waker {
        &self.waker
    }
}

impl<H> std::fmt::Debug for RealtimeEndpoints<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEndpoints")
            .field("addresses", &self.addresses)
            .field("deletions", &self.deletions)
            .field("pending_input", &self.pending_ports(Direction::Input))
            .field("pending_output", &self.pending_ports(Direction::Output))
            .finish()
    }
}
