//! Valid/ready handshake stage between the two engines
//!
//! The I2C side presents each sample as a one-tick valid pulse; the SPI
//! side is only ready between frames. A pulse landing in a busy period
//! would be lost with a purely combinational connection, so the bridge
//! holds one widened sample in a single-slot register until the
//! consumer takes it.
//!
//! Overwrite policy: a new sample arriving while one is still held
//! replaces it. The newest conversion is always the one worth sending;
//! superseded samples are counted but otherwise dropped silently.

use diavlos_protocol::Sample;

/// Single-slot pipeline stage from the I2C engine to the SPI engine
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bridge {
    /// Held 14-bit DAC data field, if any
    slot: Option<u16>,
    superseded: u32,
}

impl Bridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty the slot and clear the supersede counter
    pub fn reset(&mut self) {
        self.slot = None;
        self.superseded = 0;
    }

    /// Offer a fresh sample, widening it into the DAC data field
    ///
    /// Replaces any sample still waiting in the slot.
    pub fn offer(&mut self, sample: Sample) {
        if self.slot.replace(sample.dac_field()).is_some() {
            self.superseded = self.superseded.saturating_add(1);
        }
    }

    /// Current downstream (data, valid) pair
    pub fn output(&self) -> (u16, bool) {
        match self.slot {
            Some(data) => (data, true),
            None => (0, false),
        }
    }

    /// Whether a sample is waiting in the slot
    pub fn pending(&self) -> bool {
        self.slot.is_some()
    }

    /// Consume the held sample; call exactly on valid-and-ready ticks
    pub fn take(&mut self) {
        self.slot = None;
    }

    /// Samples replaced before the consumer took them
    pub fn superseded(&self) -> u32 {
        self.superseded
    }
}
