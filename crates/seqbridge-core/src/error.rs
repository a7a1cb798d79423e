//! Error types for the bridge.

use crate::{Address, Direction};
use thiserror::Error;

/// Error type for bridge operations.
///
/// Everything except [`Error::InvalidConfig`] and [`Error::Spawn`] is raised by
/// the port worker and terminates it.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("{direction} announcement channel full, port {address} would never be adopted")]
    AnnouncementOverflow {
        direction: Direction,
        address: Address,
    },

    #[error("{direction} port {address} already present in port table")]
    DuplicatePort {
        direction: Direction,
        address: Address,
    },

    #[error("retired {direction} port {address} is still referenced elsewhere")]
    PortStillShared {
        direction: Direction,
        address: Address,
    },

    #[error("Failed to spawn port worker: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Port worker panicked")]
    WorkerPanicked,
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Returned by a shadow-port factory when the target side cannot create a port.
///
/// Not fatal: the worker skips the port and retries on the next announcement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to construct {direction} port for {address}: {reason}")]
pub struct ConstructError {
    pub direction: Direction,
    pub address: Address,
    pub reason: String,
}

impl ConstructError {
    pub fn new(direction: Direction, address: Address, reason: impl Into<String>) -> Self {
        Self {
            direction,
            address,
            reason: reason.into(),
        }
    }
}
