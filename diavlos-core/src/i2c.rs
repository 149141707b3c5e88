//! Bit-banged I2C master engine
//!
//! Drives a Standard-mode I2C bus against a single fixed slave address:
//! one configuration write after reset, then repeated two-byte reads of
//! the conversion register forever. Each completed read presents the low
//! twelve bits of the received word as a new [`Sample`] with a one-tick
//! valid pulse.
//!
//! # Timing model
//!
//! A free-running counter divides every bit cell into four equal
//! quarters. SCL is high during the middle two quarters, SDA only
//! changes during the first quarter (SCL low) and incoming bits are
//! sampled at the start of the third (mid high phase). START and STOP
//! are the only cells that move SDA while SCL is high.
//!
//! ```text
//! quarter      |  0  |  1  |  2  |  3  |
//! SCL          |_____|‾‾‾‾‾|‾‾‾‾‾|_____|
//! SDA (write)  | set |   stable        |
//! SDA (read)   |     |     ^ sampled   |
//! ```
//!
//! The engine is open loop: slave acknowledge cells release SDA and the
//! sampled level is recorded but never gates progress, matching the
//! source hardware. A missing device is therefore invisible here and
//! shows up downstream as full-scale samples.

use diavlos_protocol::{adc, Access, Sample};

use crate::config::I2cConfig;

/// Drive state of the open-drain data line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SdaDrive {
    /// Actively pulled low
    Low,
    /// Released to the bus pull-up
    Released,
}

impl SdaDrive {
    /// Line level seen when no other device pulls the line low
    pub const fn is_released(self) -> bool {
        matches!(self, SdaDrive::Released)
    }
}

/// Output line state for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cLines {
    /// Clock line, actively driven both ways
    pub scl: bool,
    /// Data line drive
    pub sda: SdaDrive,
}

impl I2cLines {
    /// Idle bus: clock high, data released
    pub const IDLE: I2cLines = I2cLines {
        scl: true,
        sda: SdaDrive::Released,
    };
}

/// Protocol state, one variant per cell kind with bit indices folded in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum State {
    /// Bus released for one cell after reset
    Idle,
    /// START condition cell
    Start,
    /// Address byte bit `n` (0..=7, MSB first)
    AddrBit(u8),
    /// Slave acknowledge cell after the address byte
    AddrAck,
    /// Configuration byte bit `n`
    CfgBit(u8),
    /// Slave acknowledge cell after the configuration byte
    CfgAck,
    /// Received data bit `bit` of byte `byte`
    ReadBit { byte: u8, bit: u8 },
    /// Master acknowledge cell after byte `byte` (ACK, then NACK)
    ReadAck { byte: u8 },
    /// STOP condition cell
    Stop,
    /// Conversion-time wait between configuration and first read
    ConvDelay,
}

/// The I2C master controller
///
/// Advance with [`tick`](I2cMaster::tick) once per logical clock; the
/// returned [`I2cLines`] are the levels to drive for that tick.
#[derive(Debug, Clone)]
pub struct I2cMaster {
    cfg: I2cConfig,
    state: State,
    /// Tick counter within the current cell or delay
    phase: u32,
    /// Set once the configuration byte has been written
    configured: bool,
    /// Current transaction reads the conversion register
    reading: bool,
    /// Address byte for the current transaction
    addr_byte: u8,
    /// Receive shift register, MSB first
    shreg: u16,
    sample: Sample,
    sample_valid: bool,
    last_ack_low: bool,
}

impl I2cMaster {
    pub fn new(cfg: I2cConfig) -> Self {
        Self {
            cfg,
            state: State::Idle,
            phase: 0,
            configured: false,
            reading: false,
            addr_byte: 0,
            shreg: 0,
            sample: Sample::ZERO,
            sample_valid: false,
            last_ack_low: false,
        }
    }

    /// Return to the idle state, release the bus and clear the one-shot
    /// configuration flag; the next cycle re-runs the configuration
    /// write.
    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.phase = 0;
        self.configured = false;
        self.reading = false;
        self.shreg = 0;
        self.sample_valid = false;
        self.last_ack_low = false;
    }

    /// Whether the configuration write has completed since reset
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Level observed in the most recent slave acknowledge cell
    /// (true = acknowledged). Status only, never gates progress.
    pub fn last_ack_low(&self) -> bool {
        self.last_ack_low
    }

    /// The sample completed this tick, if any (one-tick pulse)
    pub fn sample(&self) -> Option<Sample> {
        if self.sample_valid {
            Some(self.sample)
        } else {
            None
        }
    }

    /// Advance one tick
    ///
    /// `sda_in` is the current level of the data line as seen on the
    /// bus (only meaningful while this engine has SDA released).
    pub fn tick(&mut self, sda_in: bool) -> I2cLines {
        self.sample_valid = false;

        match self.state {
            State::Idle => {
                self.phase += 1;
                if self.phase >= self.cfg.cell_ticks() {
                    self.phase = 0;
                    self.begin_transaction();
                }
                I2cLines::IDLE
            }
            State::ConvDelay => {
                self.phase += 1;
                if self.phase >= self.cfg.conversion_delay_ticks {
                    self.phase = 0;
                    self.begin_transaction();
                }
                I2cLines::IDLE
            }
            _ => {
                // Sample point: first tick of the third quarter
                if self.phase == 2 * self.cfg.quarter_ticks {
                    self.capture(sda_in);
                }
                let lines = self.cell_lines();
                self.phase += 1;
                if self.phase >= self.cfg.cell_ticks() {
                    self.phase = 0;
                    self.advance_cell();
                }
                lines
            }
        }
    }

    /// Latch bus state at the mid-high sample point
    fn capture(&mut self, sda_in: bool) {
        match self.state {
            State::AddrAck | State::CfgAck => self.last_ack_low = !sda_in,
            State::ReadBit { .. } => self.shreg = (self.shreg << 1) | sda_in as u16,
            _ => {}
        }
    }

    /// Line state for the current cell and quarter
    fn cell_lines(&self) -> I2cLines {
        let q = self.phase / self.cfg.quarter_ticks;
        let scl = match self.state {
            // START leaves SCL high until the final quarter
            State::Start => q < 3,
            // STOP raises SCL after the first quarter and leaves it high
            State::Stop => q != 0,
            _ => q == 1 || q == 2,
        };
        let sda = match self.state {
            State::Start => {
                // Falling edge mid-cell while SCL is high
                if q < 2 {
                    SdaDrive::Released
                } else {
                    SdaDrive::Low
                }
            }
            State::Stop => {
                // Rising edge mid-cell while SCL is high
                if q < 2 {
                    SdaDrive::Low
                } else {
                    SdaDrive::Released
                }
            }
            State::AddrBit(n) => Self::bit_drive(self.addr_byte, n),
            State::CfgBit(n) => Self::bit_drive(self.cfg.config_byte, n),
            // Receiving: release and let the slave (or pull-up) win
            State::AddrAck | State::CfgAck | State::ReadBit { .. } => SdaDrive::Released,
            // Master ACK after the first byte, NACK after the last
            State::ReadAck { byte: 0 } => SdaDrive::Low,
            State::ReadAck { .. } => SdaDrive::Released,
            State::Idle | State::ConvDelay => SdaDrive::Released,
        };
        I2cLines { scl, sda }
    }

    /// Drive for transmitted bit `n` (MSB first) of `byte`
    fn bit_drive(byte: u8, n: u8) -> SdaDrive {
        if byte & (0x80 >> n) != 0 {
            SdaDrive::Released
        } else {
            SdaDrive::Low
        }
    }

    /// Start the next transaction: a configuration write until the
    /// one-shot flag is set, read cycles afterwards.
    fn begin_transaction(&mut self) {
        self.reading = self.configured;
        let access = if self.reading {
            Access::Read
        } else {
            Access::Write
        };
        self.addr_byte = adc::address_byte(self.cfg.device_address, access);
        self.shreg = 0;
        self.state = State::Start;
    }

    /// State transition at the end of a bit cell
    fn advance_cell(&mut self) {
        self.state = match self.state {
            State::Start => State::AddrBit(0),
            State::AddrBit(7) => State::AddrAck,
            State::AddrBit(n) => State::AddrBit(n + 1),
            State::AddrAck => {
                if self.reading {
                    State::ReadBit { byte: 0, bit: 0 }
                } else {
                    State::CfgBit(0)
                }
            }
            State::CfgBit(7) => State::CfgAck,
            State::CfgBit(n) => State::CfgBit(n + 1),
            State::CfgAck => State::Stop,
            State::ReadBit { byte, bit: 7 } => State::ReadAck { byte },
            State::ReadBit { byte, bit } => State::ReadBit { byte, bit: bit + 1 },
            State::ReadAck { byte: 0 } => State::ReadBit { byte: 1, bit: 0 },
            State::ReadAck { .. } => State::Stop,
            State::Stop => {
                if self.reading {
                    self.sample = adc::result_sample(self.shreg);
                    self.sample_valid = true;
                    self.begin_transaction();
                    return;
                }
                self.configured = true;
                State::ConvDelay
            }
            // Handled directly in tick
            State::Idle | State::ConvDelay => self.state,
        };
    }
}
