//! Hardware pin bindings for the Diavlos sampling bridge
//!
//! This crate implements the pin-interface traits defined in
//! `diavlos-core` on top of `embedded-hal` 1.0 digital pins, and
//! provides a poll-driven runner that owns a datapath together with
//! both pin sets:
//!
//! - Bit-banged I2C pin pair (push-pull SCL, open-drain SDA)
//! - Bit-banged SPI pin triple (SCLK, MOSI, active-low SYNC)
//! - [`Link`](link::Link): one `poll()` per logical tick

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod link;
pub mod spi;

pub use i2c::BitBangI2cPins;
pub use link::Link;
pub use spi::BitBangSpiPins;
