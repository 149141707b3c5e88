//! Configuration type definitions
//!
//! All durations are expressed in ticks of the single logical clock.
//! The defaults reproduce the reference board: a 50 MHz tick driving
//! the I2C bus at 100 kHz and the SPI bus at 1 MHz.

use heapless::Vec;

use diavlos_protocol::{adc, dac, AdcConfigByte, Channel};

/// Reference tick rate the default timings are computed for
pub const REF_TICK_HZ: u32 = 50_000_000;

/// Maximum initialization frames the SPI engine can be configured with
pub const MAX_INIT_FRAMES: usize = 8;

/// I2C master configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct I2cConfig {
    /// 7-bit device address of the ADC
    pub device_address: u8,
    /// Configuration register byte written once after reset
    pub config_byte: u8,
    /// Ticks per quarter of a bit cell (125 -> 100 kHz at 50 MHz)
    pub quarter_ticks: u32,
    /// Ticks between the configuration STOP and the first read START,
    /// covering the device conversion time (5000 -> 100 us at 50 MHz)
    pub conversion_delay_ticks: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            device_address: adc::ADDR_AD7991_0,
            config_byte: AdcConfigByte::default().bits(),
            quarter_ticks: 125,
            conversion_delay_ticks: 5000,
        }
    }
}

impl I2cConfig {
    /// Ticks per complete bit cell
    pub const fn cell_ticks(&self) -> u32 {
        self.quarter_ticks * 4
    }
}

/// SPI master configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpiConfig {
    /// DAC channel sample frames are addressed to
    pub channel: Channel,
    /// Ticks per half bit period (25 -> 1 MHz at 50 MHz)
    pub half_period_ticks: u32,
    /// Ticks SYNC is held low after the last clock edge of a frame
    pub settle_ticks: u32,
    /// Ticks between initialization frames (2500 -> 50 us at 50 MHz)
    pub gap_ticks: u32,
    /// Frames transferred in order, exactly once, after every reset
    pub init_frames: Vec<u32, MAX_INIT_FRAMES>,
}

impl Default for SpiConfig {
    fn default() -> Self {
        let mut init_frames = Vec::new();
        for f in dac::init_sequence() {
            // Cannot fail: the sequence is shorter than MAX_INIT_FRAMES
            let _ = init_frames.push(f);
        }
        Self {
            channel: Channel::A,
            half_period_ticks: 25,
            settle_ticks: 25,
            gap_ticks: 2500,
            init_frames,
        }
    }
}

impl SpiConfig {
    /// Ticks per complete bit period
    pub const fn bit_ticks(&self) -> u32 {
        self.half_period_ticks * 2
    }
}

/// Combined configuration for the whole datapath
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkConfig {
    pub i2c: I2cConfig,
    pub spi: SpiConfig,
}
