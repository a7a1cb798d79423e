//! Sequencer port capability and type bits.
//!
//! Bit positions follow the ALSA sequencer `SND_SEQ_PORT_CAP_*` and
//! `SND_SEQ_PORT_TYPE_*` definitions so raw values from the subsystem can be
//! wrapped with `from_bits_retain` without translation.

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// What a sequencer port can do.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct PortCaps: u32 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const SYNC_READ = 1 << 2;
        const SYNC_WRITE = 1 << 3;
        const DUPLEX = 1 << 4;
        /// Other clients may subscribe to events this port emits.
        const SUBS_READ = 1 << 5;
        /// Other clients may subscribe to deliver events to this port.
        const SUBS_WRITE = 1 << 6;
        /// The port must not be exported to other clients.
        const NO_EXPORT = 1 << 7;
    }
}

bitflags::bitflags! {
    /// What kind of endpoint a sequencer port is.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct PortType: u32 {
        const SPECIFIC = 1 << 0;
        const MIDI_GENERIC = 1 << 1;
        const MIDI_GM = 1 << 2;
        const MIDI_GS = 1 << 3;
        const MIDI_XG = 1 << 4;
        const MIDI_MT32 = 1 << 5;
        const MIDI_GM2 = 1 << 6;
        const SYNTH = 1 << 10;
        const DIRECT_SAMPLE = 1 << 11;
        const SAMPLE = 1 << 12;
        const HARDWARE = 1 << 16;
        const SOFTWARE = 1 << 17;
        const SYNTHESIZER = 1 << 18;
        const PORT = 1 << 19;
        const APPLICATION = 1 << 20;
    }
}

impl PortType {
    /// Names of the known type bits that are set, in bit order.
    pub fn labels(self) -> impl Iterator<Item = &'static str> {
        self.iter_names().map(|(name, _)| name)
    }
}
