//! Test helpers and fixtures for seqbridge integration tests
//!
//! A fake sequencer and a fake graph stand in for the two subsystems. Both are
//! cheap to clone and share state, so a test keeps one copy for inspection
//! while the worker thread owns the other.

#![allow(dead_code)]

use parking_lot::Mutex;
use seqbridge::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Client id the bridge registers under in every test.
pub const BRIDGE_CLIENT: u8 = 128;

/// How long threaded tests wait for the worker before failing.
pub const WORKER_TIMEOUT: Duration = Duration::from_secs(5);

/// Install a subscriber once so worker logs show up with `--nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}

#[derive(Clone, Default)]
pub struct FakeSequencer {
    ports: Arc<Mutex<HashMap<Address, PortInfo>>>,
}

impl FakeSequencer {
    pub fn add(&self, address: Address, port_type: PortType, caps: PortCaps, name: &str) {
        self.ports
            .lock()
            .insert(address, PortInfo::new(port_type, caps, name));
    }

    pub fn remove(&self, address: Address) {
        self.ports.lock().remove(&address);
    }
}

impl PortQuery for FakeSequencer {
    fn query_port(&mut self, address: Address) -> Option<PortInfo> {
        self.ports.lock().get(&address).cloned()
    }
}

/// Graph-side handle: registration id plus the name it was registered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphPortId {
    pub id: u32,
    pub name: String,
}

#[derive(Default)]
struct GraphState {
    next_id: u32,
    live: Vec<GraphPortId>,
    freed: Vec<GraphPortId>,
}

#[derive(Clone, Default)]
pub struct FakeGraph {
    state: Arc<Mutex<GraphState>>,
}

impl FakeGraph {
    pub fn live(&self) -> Vec<GraphPortId> {
        self.state.lock().live.clone()
    }

    pub fn freed(&self) -> Vec<GraphPortId> {
        self.state.lock().freed.clone()
    }
}

impl PortFactory for FakeGraph {
    type Handle = GraphPortId;

    fn construct(
        &mut self,
        _direction: Direction,
        _address: Address,
        name: &str,
    ) -> std::result::Result<GraphPortId, ConstructError> {
        let mut state = self.state.lock();
        state.next_id += 1;
        let port = GraphPortId {
            id: state.next_id,
            name: name.to_owned(),
        };
        state.live.push(port.clone());
        Ok(port)
    }

    fn destruct(&mut self, handle: GraphPortId) {
        let mut state = self.state.lock();
        state.live.retain(|port| port.id != handle.id);
        state.freed.push(handle);
    }
}

/// Poll `condition` until it holds or [`WORKER_TIMEOUT`] elapses.
pub fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + WORKER_TIMEOUT;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    condition()
}

pub fn input_caps() -> PortCaps {
    PortCaps::READ | PortCaps::SUBS_READ
}

pub fn output_caps() -> PortCaps {
    PortCaps::WRITE | PortCaps::SUBS_WRITE
}
