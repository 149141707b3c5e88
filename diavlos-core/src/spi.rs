//! Bit-banged SPI master engine
//!
//! Drives a three-wire link (SCLK, MOSI, active-low SYNC) with 32-bit
//! frames, most-significant-bit first. MOSI is set up while SCLK is
//! low and the target samples on the rising edge; SYNC stays low for
//! the whole frame and is raised after a short settle delay, latching
//! the frame in the target.
//!
//! After every reset the engine first transfers the configured
//! initialization frames in order, separated by the configured gap,
//! before it ever asserts `ready`. In normal operation it accepts one
//! 14-bit data field per valid/ready transfer and ships it in a
//! write-and-update frame for the configured channel.
//!
//! Like the I2C side there is no feedback from the target: every frame
//! is assumed received.

use diavlos_protocol::{dac, Command};

use crate::config::SpiConfig;

/// Output line state for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiLines {
    /// Serial clock, idles low
    pub sclk: bool,
    /// Serial data, MSB first
    pub mosi: bool,
    /// Frame select, active low
    pub sync_n: bool,
}

impl SpiLines {
    /// Idle bus: clock low, frame select deasserted
    pub const IDLE: SpiLines = SpiLines {
        sclk: false,
        mosi: false,
        sync_n: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum State {
    /// Shifting frame bit `bit` (0..=31)
    Shift { bit: u8 },
    /// SYNC still low after the last clock edge
    Settle,
    /// SYNC high between startup frames (and once after reset)
    Gap,
    /// Startup complete, waiting for a sample; `ready` is asserted
    Idle,
}

/// The SPI master controller
#[derive(Debug, Clone)]
pub struct SpiMaster {
    cfg: SpiConfig,
    state: State,
    /// Tick counter within the current state
    phase: u32,
    /// Transmit shift register
    shreg: u32,
    /// Next startup frame to load
    init_next: usize,
    /// Set once the whole startup sequence has been transferred
    initialized: bool,
}

impl SpiMaster {
    pub fn new(cfg: SpiConfig) -> Self {
        let mut spi = Self {
            cfg,
            state: State::Gap,
            phase: 0,
            shreg: 0,
            init_next: 0,
            initialized: false,
        };
        spi.reset();
        spi
    }

    /// Restart the startup sequence from the first frame; `ready` stays
    /// deasserted until it completes again. Output lines return to idle
    /// immediately.
    pub fn reset(&mut self) {
        self.state = State::Gap;
        self.phase = 0;
        self.shreg = 0;
        self.init_next = 0;
        self.initialized = false;
    }

    /// Whether the startup sequence has completed since reset
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Level handshake: asserted exactly when a presented value would be
    /// accepted by the next [`tick`](SpiMaster::tick)
    pub fn ready(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    /// Advance one tick
    ///
    /// `data` is the upstream 14-bit data field, qualified by `valid`;
    /// the pair is accepted atomically on ticks where `valid` and
    /// [`ready`](SpiMaster::ready) both hold.
    pub fn tick(&mut self, data: u16, valid: bool) -> SpiLines {
        if valid && self.ready() {
            self.shreg = dac::frame(Command::WriteAndUpdate, self.cfg.channel, data);
            self.state = State::Shift { bit: 0 };
            self.phase = 0;
        }

        let lines = self.line_state();
        self.advance();
        lines
    }

    fn line_state(&self) -> SpiLines {
        match self.state {
            State::Shift { .. } => SpiLines {
                // Data set up during the low half, clocked on the rise
                sclk: self.phase >= self.cfg.half_period_ticks,
                mosi: self.shreg & 0x8000_0000 != 0,
                sync_n: false,
            },
            State::Settle => SpiLines {
                sclk: false,
                mosi: false,
                sync_n: false,
            },
            State::Gap | State::Idle => SpiLines::IDLE,
        }
    }

    fn advance(&mut self) {
        self.phase += 1;
        match self.state {
            State::Shift { bit } => {
                if self.phase >= self.cfg.bit_ticks() {
                    self.phase = 0;
                    self.shreg <<= 1;
                    self.state = if bit == 31 {
                        State::Settle
                    } else {
                        State::Shift { bit: bit + 1 }
                    };
                }
            }
            State::Settle => {
                if self.phase >= self.cfg.settle_ticks {
                    self.phase = 0;
                    // Data frames go straight back to idle; startup
                    // frames are separated by the configured gap
                    self.state = if self.initialized {
                        State::Idle
                    } else {
                        State::Gap
                    };
                }
            }
            State::Gap => {
                if self.phase >= self.cfg.gap_ticks {
                    self.phase = 0;
                    match self.cfg.init_frames.get(self.init_next) {
                        Some(&frame) => {
                            self.shreg = frame;
                            self.init_next += 1;
                            self.state = State::Shift { bit: 0 };
                        }
                        None => {
                            self.initialized = true;
                            self.state = State::Idle;
                        }
                    }
                }
            }
            State::Idle => {
                self.phase = 0;
            }
        }
    }
}
