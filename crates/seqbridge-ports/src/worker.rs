//! Port lifecycle worker.
//!
//! Runs on a non-realtime thread. Each wake drains retirements first, then
//! address announcements, so a port torn down and re-announced under the same
//! address in one batch never meets its stale table entry.
//!
//! Retirement order: the table entry is removed before the handle is given to
//! the factory, and the factory only ever receives a handle whose last
//! reference the worker holds. A freed handle is therefore unreachable from
//! both the tables and the realtime side.
//!
//! Shutdown: once the loop ends, every remaining port is marked dead and the
//! worker keeps serving retirements until its tables are empty, the realtime
//! endpoints are dropped, or [`BridgeConfig::shutdown_timeout`] runs out.

use crate::classify::{classify_all, describe_type_bits, Decision};
use crate::config::BridgeConfig;
use crate::endpoints::RealtimeEndpoints;
use crate::shadow::{shadow_port_name, ShadowPort, SharedPort};
use crate::source::{PortFactory, PortQuery};
use crate::table::PortTable;
use seqbridge_core::{
    ring_channel, wake_signal, Address, Direction, Error, Result, RingConsumer, RingProducer,
    WakeStatus, WakeWaiter,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Re-check interval while shutting down; dropped ports post no wake.
const TEARDOWN_POLL: Duration = Duration::from_millis(10);

pub struct PortWorker<Q, F: PortFactory> {
    state: PortState<Q, F>,
    deletions: RingConsumer<SharedPort<F::Handle>>,
    addresses: RingConsumer<Address>,
    announcements: [RingProducer<SharedPort<F::Handle>>; 2],
    waiter: WakeWaiter,
}

/// Everything except the channel endpoints, so a drain can borrow a channel
/// and the state at the same time.
struct PortState<Q, F: PortFactory> {
    query: Q,
    factory: F,
    client_id: u8,
    export_hw_ports: Arc<AtomicBool>,
    config: BridgeConfig,
    tables: [PortTable<F::Handle>; 2],
}

impl<Q: PortQuery, F: PortFactory> PortWorker<Q, F> {
    /// Build a worker and the realtime endpoints wired to it.
    pub fn new(
        config: BridgeConfig,
        query: Q,
        factory: F,
    ) -> Result<(Self, RealtimeEndpoints<F::Handle>)> {
        config.validate()?;

        let (address_tx, address_rx) = ring_channel(config.address_capacity);
        let (deletion_tx, deletion_rx) = ring_channel(config.deletion_capacity);
        let (input_tx, input_rx) = ring_channel(config.announcement_capacity);
        let (output_tx, output_rx) = ring_channel(config.announcement_capacity);
        let (waker, waiter) = wake_signal();

        let worker = Self {
            state: PortState {
                query,
                factory,
                client_id: config.client_id,
                export_hw_ports: Arc::new(AtomicBool::new(config.export_hw_ports)),
                config,
                tables: Direction::ALL.map(PortTable::new),
            },
            deletions: deletion_rx,
            addresses: address_rx,
            announcements: [input_tx, output_tx],
            waiter,
        };
        let endpoints = RealtimeEndpoints {
            addresses: address_tx,
            deletions: deletion_tx,
            announcements: [input_rx, output_rx],
            waker,
        };
        Ok((worker, endpoints))
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.state.config
    }

    /// Shared hardware-export switch, read once per classified port.
    pub fn export_hw_ports(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.state.export_hw_ports)
    }

    pub fn table(&self, direction: Direction) -> &PortTable<F::Handle> {
        &self.state.tables[direction.index()]
    }

    pub fn port(&self, direction: Direction, address: Address) -> Option<&SharedPort<F::Handle>> {
        self.table(direction).lookup(address)
    }

    pub fn port_count(&self, direction: Direction) -> usize {
        self.table(direction).len()
    }

    /// Worker thread body. Returns when `running` is cleared (and the worker
    /// woken), when every waker is gone, or with the first fatal error.
    ///
    /// Either way the ports are torn down before returning.
    pub fn run(mut self, running: &AtomicBool) -> Result<()> {
        tracing::debug!("port worker started");

        let result = loop {
            if !running.load(Ordering::Acquire) {
                break Ok(());
            }
            if !self.waiter.wait() {
                tracing::debug!("all wakers dropped");
                break Ok(());
            }
            if let Err(err) = self.process_cycle() {
                tracing::error!(%err, "port worker stopping on fatal error");
                break Err(err);
            }
        };

        let Self {
            mut state,
            mut deletions,
            announcements,
            waiter,
            ..
        } = self;
        // Nothing is announced from here on. Ports nobody adopted are released
        // together with the realtime side's consumers.
        drop(announcements);
        state.teardown(&mut deletions, &waiter);

        tracing::debug!("port worker exited");
        result
    }

    /// One wake's worth of work without waiting: retirements, then announcements.
    pub fn process_cycle(&mut self) -> Result<()> {
        for port in self.deletions.read_available() {
            self.state.retire(port)?;
        }
        for address in self.addresses.read_available() {
            self.state.update_port(address, &mut self.announcements)?;
        }
        Ok(())
    }
}

impl<Q: PortQuery, F: PortFactory> PortState<Q, F> {
    fn retire(&mut self, port: SharedPort<F::Handle>) -> Result<()> {
        let direction = port.direction();
        let address = port.address();
        let table = &mut self.tables[direction.index()];

        // One reference is the record itself, one more if the table still lists it.
        let listed = table
            .lookup(address)
            .is_some_and(|entry| Arc::ptr_eq(entry, &port));
        let owned = if listed { 2 } else { 1 };
        if Arc::strong_count(&port) > owned {
            return Err(Error::PortStillShared { direction, address });
        }

        table.remove_if_same(&port);
        let port = Arc::try_unwrap(port).map_err(|_| Error::PortStillShared { direction, address })?;
        tracing::info!(port = %port.name(), "port deleted");
        self.factory.destruct(port.into_handle());
        Ok(())
    }

    /// Mark everything dead, then free ports as the realtime side lets go of them.
    fn teardown(
        &mut self,
        deletions: &mut RingConsumer<SharedPort<F::Handle>>,
        waiter: &WakeWaiter,
    ) {
        for table in &self.tables {
            for (_, port) in table.iter() {
                port.mark_dead();
            }
        }

        // None: the timeout is too long to represent, wait until released
        let deadline = Instant::now().checked_add(self.config.shutdown_timeout());
        let mut connected = true;
        loop {
            for port in deletions.read_available() {
                if let Err(err) = self.retire(port) {
                    tracing::warn!(%err, "retirement refused during shutdown");
                }
            }
            self.free_unshared();

            if !connected || self.tables.iter().all(PortTable::is_empty) {
                break;
            }
            let remaining = deadline.map_or(TEARDOWN_POLL, |deadline| {
                deadline.saturating_duration_since(Instant::now())
            });
            if remaining.is_zero() {
                break;
            }
            connected = waiter.wait_timeout(remaining.min(TEARDOWN_POLL)) != WakeStatus::Disconnected;
        }

        for table in &self.tables {
            for (_, port) in table.iter() {
                tracing::warn!(
                    direction = %table.direction(),
                    port = %port.name(),
                    "port still held by realtime side at shutdown, not destroyed"
                );
            }
        }
    }

    /// Destroy every table entry nobody outside the table refers to.
    fn free_unshared(&mut self) {
        for table in &mut self.tables {
            let unshared: Vec<Address> = table
                .iter()
                .filter(|(_, port)| Arc::strong_count(*port) == 1)
                .map(|(address, _)| *address)
                .collect();

            for address in unshared {
                let Some(port) = table.remove(address) else {
                    continue;
                };
                match Arc::try_unwrap(port) {
                    Ok(port) => {
                        tracing::debug!(port = %port.name(), "port freed on shutdown");
                        self.factory.destruct(port.into_handle());
                    }
                    Err(port) => {
                        // still referenced after all; leave it for the next pass
                        let _ = table.insert_new(address, port);
                    }
                }
            }
        }
    }

    fn update_port(
        &mut self,
        address: Address,
        announcements: &mut [RingProducer<SharedPort<F::Handle>>; 2],
    ) -> Result<()> {
        if address.client == self.client_id {
            tracing::debug!(%address, "ignoring own port");
            return Ok(());
        }

        let Some(info) = self.query.query_port(address) else {
            tracing::debug!(%address, "port vanished before query");
            return Ok(());
        };

        tracing::debug!(
            %address,
            port_type = format_args!("0x{:08X}", info.port_type.bits()),
            caps = format_args!("0x{:08X}", info.caps.bits()),
            types = %describe_type_bits(info.port_type),
            "update port"
        );

        let export_hw = self.export_hw_ports.load(Ordering::Relaxed);
        let classification = classify_all(info.port_type, info.caps, &self.config.masks, export_hw);
        if let Some(reason) = classification.ignored {
            tracing::debug!(%address, "ignoring {}", reason.as_str());
            return Ok(());
        }

        for direction in Direction::ALL {
            let table = &mut self.tables[direction.index()];
            let existing = table.lookup(address).is_some();
            match classification.decision(direction) {
                Decision::ShouldNotExist if existing => {
                    table.upsert_mark_dead(address);
                    tracing::debug!(%address, %direction, "setdead");
                }
                Decision::ShouldExist if !existing => {
                    self.create_port(
                        direction,
                        address,
                        &info.name,
                        &mut announcements[direction.index()],
                    )?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn create_port(
        &mut self,
        direction: Direction,
        address: Address,
        source_name: &str,
        announce: &mut RingProducer<SharedPort<F::Handle>>,
    ) -> Result<()> {
        // A port that cannot be announced must not be created at all.
        if announce.is_full() {
            return Err(Error::AnnouncementOverflow { direction, address });
        }

        let name = shadow_port_name(direction, address, source_name);
        let handle = match self.factory.construct(direction, address, &name) {
            Ok(handle) => handle,
            Err(err) => {
                tracing::debug!(%err, "skipping port");
                return Ok(());
            }
        };

        let port = Arc::new(ShadowPort::new(direction, address, name, handle));
        self.tables[direction.index()].insert_new(address, Arc::clone(&port))?;
        if announce.try_write(Arc::clone(&port)).is_err() {
            return Err(Error::AnnouncementOverflow { direction, address });
        }

        tracing::info!(port = %port.name(), "port created");
        Ok(())
    }
}

impl<Q, F: PortFactory> std::fmt::Debug for PortWorker<Q, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortWorker")
            .field("client_id", &self.state.client_id)
            .field("input_ports", &self.state.tables[0].len())
            .field("output_ports", &self.state.tables[1].len())
            .finish()
    }
}
