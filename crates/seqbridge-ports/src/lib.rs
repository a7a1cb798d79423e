//! Port lifecycle subsystem for the sequencer-to-graph bridge.
//!
//! Mirrors sequencer ports as shadow ports on the graph side. A worker thread
//! does every slow operation (queries, allocation, table updates); the realtime
//! thread only talks to it through ring channels held in [`RealtimeEndpoints`].
//!
//! ```ignore
//! let (mut bridge, mut rt) = PortBridge::builder()
//!     .client_id(my_client)
//!     .export_hw_ports(true)
//!     .start(alsa_query, jack_factory)?;
//!
//! // sequencer announced a port change
//! rt.announce(Address::new(20, 0));
//!
//! // realtime callback
//! for port in rt.adopt_new_ports(Direction::Input) { /* start using it */ }
//!
//! bridge.stop()?;
//! ```

pub use seqbridge_core::{
    Address, ConstructError, Direction, Error, PortCaps, PortType, Result,
};

mod classify;
pub use classify::{
    classify, classify_all, describe_type_bits, ignore_reason, Classification, Decision,
    DirectionMasks, IgnoreReason,
};

mod shadow;
pub use shadow::{shadow_port_name, AdoptedPort, ShadowPort, SharedPort};

mod table;
pub use table::PortTable;

mod source;
pub use source::{PortFactory, PortInfo, PortQuery};

mod config;
pub use config::BridgeConfig;

mod endpoints;
pub use endpoints::RealtimeEndpoints;

mod worker;
pub use worker::PortWorker;

mod bridge;
pub use bridge::{PortBridge, PortBridgeBuilder};
