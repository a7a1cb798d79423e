//! Port classification.
//!
//! Decides, from the type and capability bits of a freshly queried sequencer
//! port, whether a shadow port should exist for each direction. Pure: no state,
//! no allocation.

use seqbridge_core::{Direction, PortCaps, PortType};
use serde::{Deserialize, Serialize};

/// Outcome of classifying one port for one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The port is not bridged at all; leave any existing shadow untouched.
    Ignore,
    ShouldExist,
    ShouldNotExist,
}

/// Why a port was filtered out before any per-direction check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NoType,
    Hardware,
    NoExport,
}

impl IgnoreReason {
    pub fn as_str(self) -> &'static str {
        match self {
            IgnoreReason::NoType => "port of type 0",
            IgnoreReason::Hardware => "hardware port",
            IgnoreReason::NoExport => "no-export port",
        }
    }
}

/// Capability bits a port must carry, all of them, to be bridged per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionMasks {
    pub input: PortCaps,
    pub output: PortCaps,
}

impl DirectionMasks {
    #[inline]
    pub fn mask(&self, direction: Direction) -> PortCaps {
        match direction {
            Direction::Input => self.input,
            Direction::Output => self.output,
        }
    }
}

impl Default for DirectionMasks {
    fn default() -> Self {
        Self {
            input: PortCaps::SUBS_READ,
            output: PortCaps::SUBS_WRITE,
        }
    }
}

/// Port-wide filters, evaluated in order before any direction is considered.
pub fn ignore_reason(port_type: PortType, caps: PortCaps, export_hw: bool) -> Option<IgnoreReason> {
    if port_type.bits() == 0 {
        Some(IgnoreReason::NoType)
    } else if port_type.contains(PortType::HARDWARE) && !export_hw {
        Some(IgnoreReason::Hardware)
    } else if caps.contains(PortCaps::NO_EXPORT) {
        Some(IgnoreReason::NoExport)
    } else {
        None
    }
}

/// Classify a port against one direction's mask.
///
/// The mask check is exact-AND: every bit of `mask` must be present in `caps`.
pub fn classify(port_type: PortType, caps: PortCaps, mask: PortCaps, export_hw: bool) -> Decision {
    if ignore_reason(port_type, caps, export_hw).is_some() {
        return Decision::Ignore;
    }
    decide(caps, mask)
}

#[inline]
fn decide(caps: PortCaps, mask: PortCaps) -> Decision {
    if caps.contains(mask) {
        Decision::ShouldExist
    } else {
        Decision::ShouldNotExist
    }
}

/// Decisions for both directions from a single evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub ignored: Option<IgnoreReason>,
    decisions: [Decision; 2],
}

impl Classification {
    #[inline]
    pub fn decision(&self, direction: Direction) -> Decision {
        self.decisions[direction.index()]
    }
}

pub fn classify_all(
    port_type: PortType,
    caps: PortCaps,
    masks: &DirectionMasks,
    export_hw: bool,
) -> Classification {
    match ignore_reason(port_type, caps, export_hw) {
        Some(reason) => Classification {
            ignored: Some(reason),
            decisions: [Decision::Ignore; 2],
        },
        None => Classification {
            ignored: None,
            decisions: Direction::ALL.map(|d| decide(caps, masks.mask(d))),
        },
    }
}

/// Space-separated labels of the set type bits, for debug output.
pub fn describe_type_bits(port_type: PortType) -> String {
    let mut out = String::new();
    for label in port_type.labels() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(label);
    }
    out
}
