//! Source-side port addresses and bridge directions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A port in the sequencer namespace: `(client, port)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address {
    pub client: u8,
    pub port: u8,
}

impl Address {
    pub const fn new(client: u8, port: u8) -> Self {
        Self { client, port }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.client, self.port)
    }
}

impl From<(u8, u8)> for Address {
    fn from((client, port): (u8, u8)) -> Self {
        Self::new(client, port)
    }
}

/// Which side of the bridge a shadow port serves.
///
/// `Input` ports capture events a sequencer port emits; `Output` ports play
/// events back into a sequencer port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Input, Direction::Output];

    /// Stable index for per-direction arrays.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Direction::Input => 0,
            Direction::Output => 1,
        }
    }

    /// Label used in shadow port names and log output.
    pub const fn label(self) -> &'static str {
        match self {
            Direction::Input => "capture",
            Direction::Output => "playback",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
