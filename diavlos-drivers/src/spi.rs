//! SPI bus pins over `embedded-hal` GPIO
//!
//! All three lines are plain push-pull outputs.

use embedded_hal::digital::OutputPin;

use diavlos_core::{SpiBusPins, SpiLines};

/// Bit-banged SPI pin triple
pub struct BitBangSpiPins<Sck, Mosi, Sync> {
    sck: Sck,
    mosi: Mosi,
    sync_n: Sync,
}

impl<Sck, Mosi, Sync> BitBangSpiPins<Sck, Mosi, Sync>
where
    Sck: OutputPin,
    Mosi: OutputPin,
    Sync: OutputPin,
{
    /// Take ownership of the pins, leaving the bus idle
    /// (clock low, frame select deasserted)
    pub fn new(mut sck: Sck, mut mosi: Mosi, mut sync_n: Sync) -> Self {
        sck.set_low().ok();
        mosi.set_low().ok();
        sync_n.set_high().ok();
        Self { sck, mosi, sync_n }
    }

    /// Give the pins back
    pub fn release(self) -> (Sck, Mosi, Sync) {
        (self.sck, self.mosi, self.sync_n)
    }

    fn set(pin: &mut impl OutputPin, high: bool) {
        if high {
            pin.set_high().ok();
        } else {
            pin.set_low().ok();
        }
    }
}

impl<Sck, Mosi, Sync> SpiBusPins for BitBangSpiPins<Sck, Mosi, Sync>
where
    Sck: OutputPin,
    Mosi: OutputPin,
    Sync: OutputPin,
{
    fn apply(&mut self, lines: SpiLines) {
        // Data before clock, so MOSI is stable when SCLK rises
        Self::set(&mut self.sync_n, lines.sync_n);
        Self::set(&mut self.mosi, lines.mosi);
        Self::set(&mut self.sck, lines.sclk);
    }
}
