//! # seqbridge - Sequencer-to-graph MIDI port bridge
//!
//! Mirrors ports of an event sequencer (ALSA-sequencer style) as ports of a
//! low-latency audio/MIDI graph (JACK style) without ever blocking the graph's
//! realtime callback.
//!
//! ## Architecture
//!
//! seqbridge is an umbrella crate that coordinates:
//! - **seqbridge-core** - Addresses, capability bits, SPSC ring channels, wake signal
//! - **seqbridge-ports** - Classification, port tables, lifecycle worker, bridge thread
//!
//! ## Quick Start
//!
//! ```ignore
//! use seqbridge::prelude::*;
//!
//! let (mut bridge, mut rt) = PortBridge::builder()
//!     .client_id(own_client)
//!     .start(sequencer, graph)?;
//!
//! // sequencer reported a port start/change
//! rt.announce(Address::new(20, 0));
//!
//! // in the graph's process callback
//! for port in rt.adopt_new_ports(Direction::Input) {
//!     inputs.push(port);
//! }
//! // dead ports are handed back, never dropped on this thread
//! if let Some(i) = inputs.iter().position(|port| port.is_dead()) {
//!     let port = inputs.swap_remove(i);
//!     if let Err(port) = rt.retire(port) {
//!         inputs.push(port); // deletion channel full, retry next cycle
//!     }
//! }
//!
//! // stopping marks every port dead; keep retiring them until stop returns
//! bridge.stop()?;
//! ```

/// Re-export of seqbridge-core for direct access
pub use seqbridge_core as core;

/// Re-export of seqbridge-ports for direct access
pub use seqbridge_ports as ports;

pub use seqbridge_core::{
    // Addresses and bits
    Address,
    ConstructError,
    Direction,
    Error,
    PortCaps,
    PortType,
    Result,

    // Lock-free primitives
    ring_channel,
    wake_signal,
    RingConsumer,
    RingProducer,
    WakeStatus,
    WakeWaiter,
    Waker,
};

pub use seqbridge_ports::{
    classify, shadow_port_name, AdoptedPort, BridgeConfig, Decision, DirectionMasks, PortBridge,
    PortBridgeBuilder, PortFactory, PortInfo, PortQuery, PortTable, PortWorker,
    RealtimeEndpoints, ShadowPort, SharedPort,
};

/// Everything needed to wire a bridge.
pub mod prelude {
    pub use crate::{
        AdoptedPort, Address, BridgeConfig, ConstructError, Direction, PortBridge, PortCaps, PortFactory,
        PortInfo, PortQuery, PortType, RealtimeEndpoints, Result, ShadowPort, SharedPort,
    };
}
