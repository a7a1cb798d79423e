//! Interfaces to the two subsystems the bridge sits between.
//!
//! The worker calls these from its own thread only, so implementations may
//! block and allocate.

use seqbridge_core::{Address, ConstructError, Direction, PortCaps, PortType};

/// Full metadata for a sequencer port at the moment it was queried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub port_type: PortType,
    pub caps: PortCaps,
    pub name: String,
}

impl PortInfo {
    pub fn new(port_type: PortType, caps: PortCaps, name: impl Into<String>) -> Self {
        Self {
            port_type,
            caps,
            name: name.into(),
        }
    }
}

/// Resolves a bare address into port metadata.
pub trait PortQuery: Send + 'static {
    /// `None` when the port no longer exists.
    fn query_port(&mut self, address: Address) -> Option<PortInfo>;
}

/// Creates and destroys ports on the graph side.
pub trait PortFactory: Send + 'static {
    type Handle: Send + Sync + 'static;

    /// `name` is already in graph-side form (see [`crate::shadow_port_name`]).
    fn construct(
        &mut self,
        direction: Direction,
        address: Address,
        name: &str,
    ) -> Result<Self::Handle, ConstructError>;

    /// Called once per handle, after the port is unreachable from every table
    /// and from the realtime side.
    fn destruct(&mut self, handle: Self::Handle);
}

impl<F> PortQuery for F
where
    F: FnMut(Address) -> Option<PortInfo> + Send + 'static,
{
    fn query_port(&mut self, address: Address) -> Option<PortInfo> {
        self(address)
    }
}
