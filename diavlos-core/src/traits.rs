//! Pin-interface traits
//!
//! These traits define the seam between the tick-advanced engines and
//! hardware-specific pin implementations in `diavlos-drivers`. They are
//! deliberately infallible: bit-banged GPIO writes either take effect
//! or the board is beyond protocol-level recovery, so fallibility is
//! collapsed at the adapter boundary, not threaded through the engines.

use crate::i2c::{I2cLines, SdaDrive};
use crate::spi::SpiLines;

/// The two I2C bus lines
pub trait I2cBusPins {
    /// Drive the clock line (actively driven both ways)
    fn set_scl(&mut self, high: bool);

    /// Drive or release the open-drain data line
    fn set_sda(&mut self, drive: SdaDrive);

    /// Current level of the data line
    fn sda_is_high(&mut self) -> bool;

    /// Apply a full line state for one tick
    fn apply(&mut self, lines: I2cLines) {
        self.set_scl(lines.scl);
        self.set_sda(lines.sda);
    }
}

/// The three SPI bus lines
pub trait SpiBusPins {
    /// Apply a full line state for one tick
    ///
    /// Implementations must update MOSI before raising SCLK so data is
    /// stable when the target samples the rising edge.
    fn apply(&mut self, lines: SpiLines);
}
