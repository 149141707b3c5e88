//! Board-agnostic protocol engines for the Diavlos sampling bridge
//!
//! Everything in this crate is advanced by one logical clock: each
//! engine exposes a `tick` method that consumes the current input line
//! state and returns the output line state for that tick. There are no
//! delays, threads or interrupts - timing is expressed purely in tick
//! counts, so the same engines run against real pins at 50 MHz or
//! against behavioral device models in a host test.
//!
//! - Bit-banged I2C master that configures then continuously reads the
//!   ADC conversion register
//! - Bit-banged SPI master that initializes the DAC then transmits one
//!   32-bit frame per accepted sample
//! - Valid/ready handshake bridge between the two
//! - The combined datapath and its status signals
//! - Pin-interface traits implemented by `diavlos-drivers`

#![no_std]
#![deny(unsafe_code)]

pub mod bridge;
pub mod config;
pub mod datapath;
pub mod i2c;
pub mod spi;
pub mod traits;

#[cfg(test)]
pub(crate) mod sim;

pub use bridge::Bridge;
pub use config::{I2cConfig, LinkConfig, SpiConfig};
pub use datapath::{BusLines, Datapath, LinkStatus};
pub use i2c::{I2cLines, I2cMaster, SdaDrive};
pub use spi::{SpiLines, SpiMaster};
pub use traits::{I2cBusPins, SpiBusPins};
