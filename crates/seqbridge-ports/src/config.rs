//! Bridge configuration.

use crate::classify::DirectionMasks;
use seqbridge_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the port worker and its channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Bridge hardware sequencer ports as well (default: false)
    pub export_hw_ports: bool,
    /// The bridge's own sequencer client id; its ports are never mirrored back (default: 0)
    pub client_id: u8,
    /// Pending address announcements, realtime -> worker (default: 128)
    pub address_capacity: usize,
    /// Pending port retirements, realtime -> worker (default: 128)
    pub deletion_capacity: usize,
    /// New ports awaiting adoption, per direction, worker -> realtime (default: 128)
    ///
    /// Must cover the largest burst of ports created between two realtime
    /// cycles; running out stops the worker.
    pub announcement_capacity: usize,
    /// Capability bits required per direction (default: SUBS_READ / SUBS_WRITE)
    pub masks: DirectionMasks,
    /// How long a stopping worker waits for the realtime side to hand back
    /// ports it still holds, in milliseconds (default: 500)
    pub shutdown_timeout_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            export_hw_ports: false,
            client_id: 0,
            address_capacity: 128,
            deletion_capacity: 128,
            announcement_capacity: 128,
            masks: DirectionMasks::default(),
            shutdown_timeout_ms: 500,
        }
    }
}

impl BridgeConfig {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        let capacities = [
            ("address_capacity", self.address_capacity),
            ("deletion_capacity", self.deletion_capacity),
            ("announcement_capacity", self.announcement_capacity),
        ];
        for (name, value) in capacities {
            if value == 0 {
                return Err(Error::InvalidConfig(format!("{name} must be non-zero")));
            }
        }
        if self.masks.input.is_empty() || self.masks.output.is_empty() {
            return Err(Error::InvalidConfig(
                "direction masks must require at least one capability".into(),
            ));
        }
        Ok(())
    }
}
