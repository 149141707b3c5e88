//! Poll-driven bridge runner
//!
//! Owns the datapath and both pin sets; every call to
//! [`poll`](Link::poll) is one tick of the logical clock. The caller
//! provides the tick cadence (a timer interrupt, a delay loop, or a
//! test loop) - one poll at 50 MHz reproduces the reference timings
//! with the default configuration.

use diavlos_core::{Datapath, I2cBusPins, I2cLines, LinkConfig, LinkStatus, SpiBusPins, SpiLines};

/// A datapath bound to its pins
pub struct Link<I, S> {
    datapath: Datapath,
    i2c_pins: I,
    spi_pins: S,
}

impl<I, S> Link<I, S>
where
    I: I2cBusPins,
    S: SpiBusPins,
{
    /// Build the link and leave both buses idle
    pub fn new(cfg: LinkConfig, mut i2c_pins: I, mut spi_pins: S) -> Self {
        i2c_pins.apply(I2cLines::IDLE);
        spi_pins.apply(SpiLines::IDLE);
        Self {
            datapath: Datapath::new(cfg),
            i2c_pins,
            spi_pins,
        }
    }

    /// Advance one tick: sample SDA, tick the datapath, drive the pins
    pub fn poll(&mut self) -> LinkStatus {
        let sda = self.i2c_pins.sda_is_high();
        let lines = self.datapath.tick(sda);
        self.i2c_pins.apply(lines.i2c);
        self.spi_pins.apply(lines.spi);
        self.datapath.status()
    }

    /// Global reset: datapath back to initial state, buses idle
    pub fn reset(&mut self) {
        self.datapath.reset();
        self.i2c_pins.apply(I2cLines::IDLE);
        self.spi_pins.apply(SpiLines::IDLE);
    }

    pub fn status(&self) -> LinkStatus {
        self.datapath.status()
    }

    pub fn datapath(&self) -> &Datapath {
        &self.datapath
    }

    /// Tear down and give the pins back
    pub fn release(self) -> (I, S) {
        (self.i2c_pins, self.spi_pins)
    }
}
