//! Behavioral device models and bench harnesses for engine tests
//!
//! The models decode the buses by the same electrical rules a real
//! device applies (START/STOP by SDA transitions while SCL is high,
//! bits on SCL rising edges, frames bracketed by SYNC), so a passing
//! test demonstrates waveform-level correctness, not just state-machine
//! bookkeeping.
//!
//! The benches wire an engine to its model with wired-AND open-drain
//! semantics: the SDA line reads high only while both sides release it.
//! The engine's drive from the previous tick is used for the feedback
//! path; with multi-tick quarters this skew is invisible at every
//! sample point.

use heapless::Vec;

use diavlos_protocol::Sample;

use crate::config::{I2cConfig, LinkConfig, SpiConfig};
use crate::datapath::{BusLines, Datapath};
use crate::i2c::I2cMaster;
use crate::spi::{SpiLines, SpiMaster};

/// Behavioral model of an AD7991-class I2C slave
///
/// Acts as a proper bus citizen: decodes the address byte, acknowledges
/// when addressed (unless `ack_enabled` is cleared), records written
/// configuration bytes and serves `next_word` on reads, MSB first.
#[derive(Debug, Clone)]
pub struct AdcModel {
    /// 7-bit address the model answers to
    pub address: u8,
    /// Drive acknowledge cells when addressed
    pub ack_enabled: bool,
    /// 16-bit result word served on the next read
    pub next_word: u16,

    /// Configuration writes observed
    pub config_writes: usize,
    /// Most recent configuration byte received
    pub last_config: Option<u8>,
    /// Complete two-byte reads served
    pub reads_completed: usize,

    prev_scl: bool,
    prev_sda: bool,
    pulling_low: bool,
    phase: Phase,
    shreg: u8,
    bit_count: u8,
    addressed: bool,
    reading: bool,
    word: u16,
    tx_index: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    /// Receiving the address byte
    Address,
    /// Driving the acknowledge cell after the address byte
    AckAddress,
    /// Receiving a written data byte
    Receive,
    /// Driving the acknowledge cell after a data byte
    AckData,
    /// Driving data bit `tx_index` of the result word
    Transmit,
    /// Released during the master's ACK/NACK cell
    MasterAck { more: bool },
}

impl AdcModel {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            ack_enabled: true,
            next_word: 0,
            config_writes: 0,
            last_config: None,
            reads_completed: 0,
            prev_scl: true,
            prev_sda: true,
            pulling_low: false,
            phase: Phase::Idle,
            shreg: 0,
            bit_count: 0,
            addressed: false,
            reading: false,
            word: 0,
            tx_index: 0,
        }
    }

    /// Whether the model currently pulls SDA low
    pub fn pulling_low(&self) -> bool {
        self.pulling_low
    }

    /// Observe the bus for one tick
    ///
    /// `sda` is the resolved line level including this model's own
    /// drive.
    pub fn observe(&mut self, scl: bool, sda: bool) {
        let rising = scl && !self.prev_scl;
        let falling = !scl && self.prev_scl;
        let start = scl && self.prev_scl && self.prev_sda && !sda;
        let stop = scl && self.prev_scl && !self.prev_sda && sda;

        if start {
            self.phase = Phase::Address;
            self.bit_count = 0;
            self.shreg = 0;
            self.pulling_low = false;
        } else if stop {
            self.phase = Phase::Idle;
            self.pulling_low = false;
        } else if rising {
            match self.phase {
                Phase::Address | Phase::Receive => {
                    self.shreg = (self.shreg << 1) | sda as u8;
                    self.bit_count += 1;
                }
                _ => {}
            }
        } else if falling {
            self.on_falling_edge();
        }

        self.prev_scl = scl;
        self.prev_sda = sda;
    }

    /// Cell boundaries are SCL falling edges: decide acknowledge drives
    /// and advance transmitted bits here, while the clock is low.
    fn on_falling_edge(&mut self) {
        match self.phase {
            Phase::Address if self.bit_count == 8 => {
                self.addressed = (self.shreg >> 1) == self.address;
                self.reading = self.shreg & 1 != 0;
                if self.addressed {
                    self.pulling_low = self.ack_enabled;
                    self.phase = Phase::AckAddress;
                } else {
                    self.phase = Phase::Idle;
                }
            }
            Phase::AckAddress => {
                self.pulling_low = false;
                if self.reading {
                    self.word = self.next_word;
                    self.tx_index = 15;
                    self.drive_tx_bit();
                    self.phase = Phase::Transmit;
                } else {
                    self.bit_count = 0;
                    self.shreg = 0;
                    self.phase = Phase::Receive;
                }
            }
            Phase::Receive if self.bit_count == 8 => {
                self.config_writes += 1;
                self.last_config = Some(self.shreg);
                self.pulling_low = self.ack_enabled;
                self.phase = Phase::AckData;
            }
            Phase::AckData => {
                self.pulling_low = false;
                self.bit_count = 0;
                self.shreg = 0;
                self.phase = Phase::Receive;
            }
            Phase::Transmit => {
                if self.tx_index == 8 {
                    // Byte boundary: release for the master's ACK
                    self.pulling_low = false;
                    self.phase = Phase::MasterAck { more: true };
                } else if self.tx_index == 0 {
                    self.pulling_low = false;
                    self.reads_completed += 1;
                    self.phase = Phase::MasterAck { more: false };
                } else {
                    self.tx_index -= 1;
                    self.drive_tx_bit();
                }
            }
            Phase::MasterAck { more: true } => {
                self.tx_index = 7;
                self.drive_tx_bit();
                self.phase = Phase::Transmit;
            }
            Phase::MasterAck { more: false } => {
                self.phase = Phase::Idle;
            }
            _ => {}
        }
    }

    fn drive_tx_bit(&mut self) {
        self.pulling_low = (self.word >> self.tx_index) & 1 == 0;
    }
}

/// Passive monitor reconstructing DAC frames bit by bit
///
/// Shifts MOSI on every SCLK rising edge while SYNC is low and latches
/// a frame on the SYNC rising edge, exactly as the target device does.
/// Frames with a bit count other than 32 (aborted transfers) are
/// discarded.
#[derive(Debug, Clone)]
pub struct DacMonitor {
    pub frames: Vec<u32, 32>,
    shreg: u32,
    bits: u8,
    prev_sclk: bool,
    prev_sync_n: bool,
}

impl DacMonitor {
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            shreg: 0,
            bits: 0,
            prev_sclk: false,
            prev_sync_n: true,
        }
    }

    pub fn reset(&mut self) {
        self.frames.clear();
        self.shreg = 0;
        self.bits = 0;
        self.prev_sclk = false;
        self.prev_sync_n = true;
    }

    pub fn observe(&mut self, lines: SpiLines) {
        if !lines.sync_n && lines.sclk && !self.prev_sclk {
            self.shreg = (self.shreg << 1) | lines.mosi as u32;
            self.bits = self.bits.saturating_add(1);
        }
        if lines.sync_n && !self.prev_sync_n {
            if self.bits == 32 {
                let _ = self.frames.push(self.shreg);
            }
            self.shreg = 0;
            self.bits = 0;
        }
        if !lines.sync_n && self.prev_sync_n {
            self.shreg = 0;
            self.bits = 0;
        }
        self.prev_sclk = lines.sclk;
        self.prev_sync_n = lines.sync_n;
    }
}

/// I2C master wired to an [`AdcModel`]
pub struct I2cBench {
    pub master: I2cMaster,
    pub model: AdcModel,
    last_sda_released: bool,
}

impl I2cBench {
    pub fn new(cfg: I2cConfig, model: AdcModel) -> Self {
        Self {
            master: I2cMaster::new(cfg),
            model,
            last_sda_released: true,
        }
    }

    pub fn step(&mut self) {
        let line = self.last_sda_released && !self.model.pulling_low();
        let lines = self.master.tick(line);
        let bus_sda = lines.sda.is_released() && !self.model.pulling_low();
        self.model.observe(lines.scl, bus_sda);
        self.last_sda_released = lines.sda.is_released();
    }

    /// Run `ticks` ticks, collecting every emitted sample
    pub fn run_collecting(&mut self, ticks: u32) -> Vec<Sample, 32> {
        let mut samples = Vec::new();
        for _ in 0..ticks {
            self.step();
            if let Some(s) = self.master.sample() {
                let _ = samples.push(s);
            }
        }
        samples
    }

    /// Run until the next sample pulse
    pub fn run_until_sample(&mut self, max_ticks: u32) -> Option<Sample> {
        for _ in 0..max_ticks {
            self.step();
            if let Some(s) = self.master.sample() {
                return Some(s);
            }
        }
        None
    }
}

/// SPI master wired to a [`DacMonitor`]
pub struct SpiBench {
    pub master: SpiMaster,
    pub monitor: DacMonitor,
}

impl SpiBench {
    pub fn new(cfg: SpiConfig) -> Self {
        Self {
            master: SpiMaster::new(cfg),
            monitor: DacMonitor::new(),
        }
    }

    pub fn step(&mut self, data: u16, valid: bool) -> SpiLines {
        let lines = self.master.tick(data, valid);
        self.monitor.observe(lines);
        lines
    }

    /// Run with no input until ready asserts; returns ticks taken
    pub fn run_until_ready(&mut self, max_ticks: u32) -> Option<u32> {
        for tick in 0..max_ticks {
            if self.master.ready() {
                return Some(tick);
            }
            self.step(0, false);
        }
        None
    }

    /// Run with no input until the next complete frame is captured
    pub fn run_until_frame(&mut self, max_ticks: u32) -> Option<u32> {
        let before = self.monitor.frames.len();
        for _ in 0..max_ticks {
            self.step(0, false);
            if self.monitor.frames.len() > before {
                return self.monitor.frames.last().copied();
            }
        }
        None
    }
}

/// Full datapath wired to both device models
pub struct LoopBench {
    pub dp: Datapath,
    pub model: AdcModel,
    pub monitor: DacMonitor,
    last_sda_released: bool,
}

impl LoopBench {
    pub fn new(cfg: LinkConfig, model: AdcModel) -> Self {
        Self {
            dp: Datapath::new(cfg),
            model,
            monitor: DacMonitor::new(),
            last_sda_released: true,
        }
    }

    pub fn step(&mut self) -> BusLines {
        let line = self.last_sda_released && !self.model.pulling_low();
        let lines = self.dp.tick(line);
        let bus_sda = lines.i2c.sda.is_released() && !self.model.pulling_low();
        self.model.observe(lines.i2c.scl, bus_sda);
        self.monitor.observe(lines.spi);
        self.last_sda_released = lines.i2c.sda.is_released();
        lines
    }

    /// Reset the datapath and both test fixtures together
    pub fn reset_all(&mut self) {
        self.dp.reset();
        let address = self.model.address;
        let next_word = self.model.next_word;
        self.model = AdcModel::new(address);
        self.model.next_word = next_word;
        self.monitor.reset();
        self.last_sda_released = true;
    }

    /// Run until `count` frames have been captured in total
    pub fn run_until_frames(&mut self, count: usize, max_ticks: u32) -> Option<u32> {
        for tick in 0..max_ticks {
            self.step();
            if self.monitor.frames.len() >= count {
                return Some(tick);
            }
        }
        None
    }

    /// Run until the next I2C sample pulse
    pub fn run_until_sample(&mut self, max_ticks: u32) -> Option<Sample> {
        for _ in 0..max_ticks {
            self.step();
            if let Some(s) = self.dp.sample() {
                return Some(s);
            }
        }
        None
    }
}
