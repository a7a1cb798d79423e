//! Core primitives for the sequencer-to-graph port bridge.
//!
//! # Primary API
//!
//! - [`Address`] / [`Direction`]: identify a source port and which side of the bridge it lands on
//! - [`PortCaps`] / [`PortType`]: capability and type bitsets reported by the sequencer
//! - [`ring_channel`]: fixed-capacity SPSC queue for handing records between threads
//! - [`wake_signal`]: coalescing binary semaphore that drives the port worker
//!
//! Nothing in this crate blocks except [`WakeWaiter::wait`] and
//! [`WakeWaiter::wait_timeout`].

pub mod error;
pub use error::{ConstructError, Error, Result};

mod address;
pub use address::{Address, Direction};

mod caps;
pub use caps::{PortCaps, PortType};

mod ring;
pub use ring::{ring_channel, Drain, RingConsumer, RingProducer};

mod wake;
pub use wake::{wake_signal, WakeStatus, WakeWaiter, Waker};
