//! I2C bus pins over `embedded-hal` GPIO
//!
//! SCL is driven push-pull both ways, matching the engine's simplified
//! clock handling. SDA must be a pin configured open-drain at the HAL
//! level (or an open-drain circuit): writing it high releases the line
//! to the bus pull-up, writing it low asserts it, and the input path
//! reads the resolved line level.

use embedded_hal::digital::{InputPin, OutputPin};

use diavlos_core::{I2cBusPins, SdaDrive};

/// Bit-banged I2C pin pair
pub struct BitBangI2cPins<Scl, Sda> {
    scl: Scl,
    sda: Sda,
}

impl<Scl, Sda> BitBangI2cPins<Scl, Sda>
where
    Scl: OutputPin,
    Sda: OutputPin + InputPin,
{
    /// Take ownership of the pins, leaving the bus idle (both high)
    pub fn new(mut scl: Scl, mut sda: Sda) -> Self {
        scl.set_high().ok();
        sda.set_high().ok();
        Self { scl, sda }
    }

    /// Give the pins back, e.g. to hand them to a hardware peripheral
    pub fn release(self) -> (Scl, Sda) {
        (self.scl, self.sda)
    }
}

impl<Scl, Sda> I2cBusPins for BitBangI2cPins<Scl, Sda>
where
    Scl: OutputPin,
    Sda: OutputPin + InputPin,
{
    fn set_scl(&mut self, high: bool) {
        if high {
            self.scl.set_high().ok();
        } else {
            self.scl.set_low().ok();
        }
    }

    fn set_sda(&mut self, drive: SdaDrive) {
        match drive {
            SdaDrive::Low => self.sda.set_low().ok(),
            SdaDrive::Released => self.sda.set_high().ok(),
        };
    }

    fn sda_is_high(&mut self) -> bool {
        // An unreadable pin reads as the pull-up level
        self.sda.is_high().unwrap_or(true)
    }
}
