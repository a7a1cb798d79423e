//! Shadow ports: the graph-side mirror of a sequencer port.

use seqbridge_core::{Address, Direction};
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared reference held by the worker's tables and in flight on the channels.
pub type SharedPort<H> = Arc<ShadowPort<H>>;

/// A bridged port and the target-side resource backing it.
///
/// Only the worker creates, marks dead, and destroys shadow ports. The realtime
/// side may read [`is_dead`](Self::is_dead) and use the handle.
pub struct ShadowPort<H> {
    direction: Direction,
    address: Address,
    name: String,
    dead: AtomicBool,
    handle: H,
}

impl<H> ShadowPort<H> {
    pub(crate) fn new(direction: Direction, address: Address, name: String, handle: H) -> Self {
        Self {
            direction,
            address,
            name,
            dead: AtomicBool::new(false),
            handle,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// RT-safe. Once true, the realtime side should stop using the port and retire it.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn mark_dead(&self) {
        self.dead.store(true, Ordering::Release);
    }

    pub(crate) fn into_handle(self) -> H {
        self.handle
    }
}

impl<H> std::fmt::Debug for ShadowPort<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShadowPort")
            .field("direction", &self.direction)
            .field("address", &self.address)
            .field("name", &self.name)
            .field("dead", &self.is_dead())
            .finish()
    }
}

/// A shadow port owned by the realtime side.
///
/// Not `Clone`: once passed to [`RealtimeEndpoints::retire`] it cannot be used
/// again, so the worker always receives the last outside reference.
///
/// ```compile_fail
/// fn keep_a_copy<H>(port: &seqbridge_ports::AdoptedPort<H>) -> seqbridge_ports::AdoptedPort<H> {
///     port.clone()
/// }
/// ```
///
/// [`RealtimeEndpoints::retire`]: crate::RealtimeEndpoints::retire
pub struct AdoptedPort<H> {
    port: SharedPort<H>,
}

impl<H> AdoptedPort<H> {
    pub(crate) fn new(port: SharedPort<H>) -> Self {
        Self { port }
    }

    pub(crate) fn into_shared(self) -> SharedPort<H> {
        self.port
    }
}

impl<H> Deref for AdoptedPort<H> {
    type Target = ShadowPort<H>;

    #[inline]
    fn deref(&self) -> &ShadowPort<H> {
        &self.port
    }
}

impl<H> std::fmt::Debug for AdoptedPort<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&*self.port, f)
    }
}

/// Conventional graph-side name: `"<port name> [<client>:<port>] (<capture|playback>)"`.
///
/// Characters the graph rejects in port names are replaced with spaces.
pub fn shadow_port_name(direction: Direction, address: Address, source_name: &str) -> String {
    let raw = format!("{} [{}] ({})", source_name.trim(), address, direction);
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || " /:,-+()[]_.".contains(c) {
                c
            } else {
                ' '
            }
        })
        .collect()
}
