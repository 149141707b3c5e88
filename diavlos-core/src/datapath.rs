//! The complete sampling datapath
//!
//! Owns the three stages and advances them in lock step: one call to
//! [`Datapath::tick`] is one tick of the single logical clock for the
//! whole design. Data flows strictly one way: I2C engine, bridge, SPI
//! engine; the only coupling back upstream is the ready level consumed
//! by the bridge when it commits a transfer.

use diavlos_protocol::Sample;

use crate::bridge::Bridge;
use crate::config::LinkConfig;
use crate::i2c::{I2cLines, I2cMaster};
use crate::spi::{SpiLines, SpiMaster};

/// Output line state of both buses for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusLines {
    pub i2c: I2cLines,
    pub spi: SpiLines,
}

/// Plain status signals for an external monitor to sample
///
/// Observability only: nothing here feeds back into the datapath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStatus {
    /// The ADC configuration write has completed since reset
    pub adc_configured: bool,
    /// The DAC startup sequence has completed since reset
    pub dac_initialized: bool,
    /// The SPI engine would accept a sample this tick
    pub spi_ready: bool,
    /// A sample is waiting in the bridge slot
    pub sample_pending: bool,
    /// Level observed in the most recent slave acknowledge cell
    pub last_ack_low: bool,
    /// Samples superseded in the bridge before transfer
    pub superseded: u32,
}

/// I2C engine, bridge and SPI engine in lock step
#[derive(Debug, Clone)]
pub struct Datapath {
    i2c: I2cMaster,
    bridge: Bridge,
    spi: SpiMaster,
}

impl Datapath {
    pub fn new(cfg: LinkConfig) -> Self {
        Self {
            i2c: I2cMaster::new(cfg.i2c),
            bridge: Bridge::new(),
            spi: SpiMaster::new(cfg.spi),
        }
    }

    /// Global reset: both engines return to their initial states and
    /// re-run their one-shot initialization phases; any in-flight
    /// transaction is abandoned.
    pub fn reset(&mut self) {
        self.i2c.reset();
        self.bridge.reset();
        self.spi.reset();
    }

    /// Advance the whole datapath one tick
    ///
    /// `sda_in` is the observed level of the I2C data line. The bridge
    /// slot is written and read within this single call, so the
    /// valid/ready transfer is atomic per tick.
    pub fn tick(&mut self, sda_in: bool) -> BusLines {
        let i2c = self.i2c.tick(sda_in);
        if let Some(sample) = self.i2c.sample() {
            self.bridge.offer(sample);
        }

        let (data, valid) = self.bridge.output();
        let ready = self.spi.ready();
        let spi = self.spi.tick(data, valid);
        if ready && valid {
            self.bridge.take();
        }

        BusLines { i2c, spi }
    }

    pub fn status(&self) -> LinkStatus {
        LinkStatus {
            adc_configured: self.i2c.is_configured(),
            dac_initialized: self.spi.is_initialized(),
            spi_ready: self.spi.ready(),
            sample_pending: self.bridge.pending(),
            last_ack_low: self.i2c.last_ack_low(),
            superseded: self.bridge.superseded(),
        }
    }

    /// The sample completed this tick, if any (one-tick pulse)
    pub fn sample(&self) -> Option<Sample> {
        self.i2c.sample()
    }

    pub fn i2c(&self) -> &I2cMaster {
        &self.i2c
    }

    pub fn spi(&self) -> &SpiMaster {
        &self.spi
    }

    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }
}
