//! Wire-level device encodings for the Diavlos sampling bridge
//!
//! This crate defines the register and frame formats spoken on the two
//! buses: the I2C conventions of the AD7991-class ADC that produces
//! samples, and the 32-bit SPI frame format of the AD5628-class DAC that
//! consumes them.
//!
//! # DAC frame format
//!
//! ```text
//! ┌─────────┬─────────┬───────────────────┬──────────┐
//! │ COMMAND │ ADDRESS │ DATA              │ RESERVED │
//! │ 31:28   │ 27:24   │ 23:8 (14-bit)     │ 7:0      │
//! └─────────┴─────────┴───────────────────┴──────────┘
//! ```
//!
//! The data field is 14 bits wide; a 12-bit sample is placed into it
//! left-shifted by two, so bits 23:22 of a sample frame are always clear
//! and the reserved byte is always zero.
//!
//! Everything here is plain bit arithmetic with no hardware dependencies,
//! so the same definitions serve the protocol engines and the bus
//! monitors used in tests.

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod dac;
pub mod sample;

pub use adc::{Access, AdcConfigByte};
pub use dac::{Channel, Command};
pub use sample::Sample;
