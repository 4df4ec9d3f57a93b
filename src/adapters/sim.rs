//! Host simulation of the master's bus and everything on it.
//!
//! ```text
//!               SimBus (single master)
//!   ┌──────────┬──────────┬──────────┬────────────────────┐
//!   │ SimSensor│ SimEeprom│ SimRtc   │ target: BusDevice  │
//!   │  0x4D    │  0x50    │  0x68    │  0x08              │
//!   └──────────┴──────────┴──────────┴────────────────────┘
//!                                     RecordingTarget, or
//!                                     SlaveEndpoint → I2cClient
//! ```
//!
//! Busy cycles, a stuck bus, and a NACKing address can be injected so the
//! master's wait and error paths run deterministically.

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use log::info;

use crate::app::ports::{ActuatorPort, BusPort, IndicatorPort, MotorPort};
use crate::config::MasterConfig;
use crate::control::actuation::DutyLevel;
use crate::control::direction::MotorDirection;
use crate::error::BusError;
use crate::i2c::client::I2cClient;
use crate::i2c::sim::SimClientHardware;
use crate::i2c::traits::ClientHandler;
use crate::sensors::clock::SNAPSHOT_LEN;

/// A device on the simulated bus.  Addressing is done by [`SimBus`].
pub trait BusDevice {
    fn write(&mut self, bytes: &[u8]) -> Result<(), BusError>;

    fn read(&mut self, buffer: &mut [u8]) -> Result<(), BusError>;
}

// ── Devices ───────────────────────────────────────────────────

/// Temperature sensor returning a scripted series of readings.  Once the
/// script runs out the last reading repeats.
#[derive(Debug, Default)]
pub struct SimSensor {
    readings: VecDeque<u8>,
    last: u8,
    pointer: u8,
}

impl SimSensor {
    /// Replace the remaining script.
    pub fn script(&mut self, readings: &[u8]) {
        self.readings = readings.iter().copied().collect();
    }

    /// Scripted readings not yet returned.
    pub fn remaining(&self) -> usize {
        self.readings.len()
    }

    /// Register pointer last written by the master.
    pub fn pointer(&self) -> u8 {
        self.pointer
    }
}

impl BusDevice for SimSensor {
    fn write(&mut self, bytes: &[u8]) -> Result<(), BusError> {
        if let Some(&register) = bytes.first() {
            self.pointer = register;
        }
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<(), BusError> {
        for slot in buffer.iter_mut() {
            if let Some(next) = self.readings.pop_front() {
                self.last = next;
            }
            *slot = self.last;
        }
        Ok(())
    }
}

/// Bytes of the simulated EEPROM.
pub const EEPROM_SIZE: usize = 256;

/// 24C02-style EEPROM: word address byte first, then data.  Starts erased.
#[derive(Debug)]
pub struct SimEeprom {
    cells: [u8; EEPROM_SIZE],
    pointer: u8,
    writes: usize,
}

impl SimEeprom {
    pub fn new() -> Self {
        Self {
            cells: [crate::alarm_log::ERASED; EEPROM_SIZE],
            pointer: 0,
            writes: 0,
        }
    }

    pub fn cell(&self, offset: u8) -> u8 {
        self.cells[usize::from(offset)]
    }

    pub fn set_cell(&mut self, offset: u8, value: u8) {
        self.cells[usize::from(offset)] = value;
    }

    /// `len` bytes from `offset`, clamped to the end of the device.
    pub fn slice(&self, offset: u8, len: usize) -> &[u8] {
        let start = usize::from(offset);
        let end = (start + len).min(EEPROM_SIZE);
        &self.cells[start..end]
    }

    /// Write cycles performed (address-only writes excluded).
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Default for SimEeprom {
    fn default() -> Self {
        Self::new()
    }
}

impl BusDevice for SimEeprom {
    fn write(&mut self, bytes: &[u8]) -> Result<(), BusError> {
        let Some((&address, data)) = bytes.split_first() else {
            return Ok(());
        };
        self.pointer = address;
        for &byte in data {
            self.cells[usize::from(self.pointer)] = byte;
            self.pointer = self.pointer.wrapping_add(1);
        }
        if !data.is_empty() {
            self.writes += 1;
        }
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<(), BusError> {
        for slot in buffer.iter_mut() {
            *slot = self.cells[usize::from(self.pointer)];
            self.pointer = self.pointer.wrapping_add(1);
        }
        Ok(())
    }
}

/// RTC with seven registers and an auto-incrementing pointer.
#[derive(Debug, Default)]
pub struct SimRtc {
    regs: [u8; SNAPSHOT_LEN],
    pointer: usize,
}

impl SimRtc {
    pub fn set(&mut self, regs: [u8; SNAPSHOT_LEN]) {
        self.regs = regs;
    }
}

impl BusDevice for SimRtc {
    fn write(&mut self, bytes: &[u8]) -> Result<(), BusError> {
        let Some((&pointer, data)) = bytes.split_first() else {
            return Ok(());
        };
        self.pointer = usize::from(pointer) % SNAPSHOT_LEN;
        for &byte in data {
            self.regs[self.pointer] = byte;
            self.pointer = (self.pointer + 1) % SNAPSHOT_LEN;
        }
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<(), BusError> {
        for slot in buffer.iter_mut() {
            *slot = self.regs[self.pointer];
            self.pointer = (self.pointer + 1) % SNAPSHOT_LEN;
        }
        Ok(())
    }
}

/// Target that ACKs everything and remembers every write.  Host reads
/// return zeros.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    writes: Vec<Vec<u8>>,
}

impl RecordingTarget {
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }
}

impl BusDevice for RecordingTarget {
    fn write(&mut self, bytes: &[u8]) -> Result<(), BusError> {
        self.writes.push(bytes.to_vec());
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<(), BusError> {
        buffer.fill(0);
        Ok(())
    }
}

// ── Slave endpoint ────────────────────────────────────────────

/// The slave microcontroller: a real client engine on simulated
/// hardware.  Every host transfer is walked through the engine one
/// interrupt per bus phase.
pub struct SlaveEndpoint<C> {
    client: I2cClient<SimClientHardware, C>,
}

impl<C: ClientHandler> SlaveEndpoint<C> {
    /// Initialize the engine at `address` and register `handler`.
    pub fn new(address: u8, handler: C) -> Self {
        let mut client = I2cClient::new(SimClientHardware::new(), address);
        client.initialize();
        client.callback_register(Some(handler));
        Self { client }
    }

    pub fn client(&self) -> &I2cClient<SimClientHardware, C> {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut I2cClient<SimClientHardware, C> {
        &mut self.client
    }

    fn address_phase(&mut self, raw: u8) -> Result<(), BusError> {
        self.client.hardware_mut().present_address(raw);
        self.client.on_interrupt();
        self.acked()
    }

    fn acked(&mut self) -> Result<(), BusError> {
        if self.client.hardware().last_ack() == Some(true) {
            Ok(())
        } else {
            self.stop();
            Err(BusError::Nack {
                address: self.client.address(),
            })
        }
    }

    fn stop(&mut self) {
        self.client.hardware_mut().present_stop();
        self.client.on_interrupt();
    }
}

impl<C: ClientHandler> BusDevice for SlaveEndpoint<C> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), BusError> {
        self.address_phase(self.client.address() << 1)?;
        for &byte in bytes {
            self.client.hardware_mut().present_data(byte);
            self.client.on_interrupt();
            self.acked()?;
        }
        self.stop();
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<(), BusError> {
        self.address_phase((self.client.address() << 1) | 0x01)?;
        for (i, slot) in buffer.iter_mut().enumerate() {
            if i > 0 {
                self.client.hardware_mut().request_read_data();
                self.client.on_interrupt();
            }
            // Nothing loaded: SDA idles high.
            *slot = self.client.hardware_mut().shift_out().unwrap_or(0xFF);
        }
        self.stop();
        Ok(())
    }
}

// ── Bus ───────────────────────────────────────────────────────

/// Simulated single-master bus with the master's peripherals attached.
pub struct SimBus<T = RecordingTarget> {
    pub sensor: SimSensor,
    pub eeprom: SimEeprom,
    pub rtc: SimRtc,
    pub target: T,
    sensor_address: u8,
    eeprom_address: u8,
    rtc_address: u8,
    target_address: u8,
    busy_cycles: u32,
    busy_left: u32,
    stuck: bool,
    nack: Option<u8>,
    transfers: usize,
}

impl<T: BusDevice> SimBus<T> {
    /// Bus laid out per `config`, with `target` at the slave address.
    pub fn new(config: &MasterConfig, target: T) -> Self {
        Self {
            sensor: SimSensor::default(),
            eeprom: SimEeprom::new(),
            rtc: SimRtc::default(),
            target,
            sensor_address: config.sensor_address,
            eeprom_address: config.eeprom_address,
            rtc_address: config.rtc_address,
            target_address: config.slave_address,
            busy_cycles: 0,
            busy_left: 0,
            stuck: false,
            nack: None,
            transfers: 0,
        }
    }

    /// Report busy for `cycles` polls after every transfer.
    pub fn set_busy_cycles(&mut self, cycles: u32) {
        self.busy_cycles = cycles;
    }

    /// Keep the bus busy forever.
    pub fn set_stuck(&mut self, stuck: bool) {
        self.stuck = stuck;
    }

    /// Make every transfer to `address` fail with a NACK.
    pub fn set_nack(&mut self, address: Option<u8>) {
        self.nack = address;
    }

    /// Transfers started, failed ones included.
    pub fn transfers(&self) -> usize {
        self.transfers
    }

    fn begin(&mut self, address: u8) -> Result<&mut dyn BusDevice, BusError> {
        self.transfers += 1;
        self.busy_left = self.busy_cycles;
        if self.nack == Some(address) {
            return Err(BusError::Nack { address });
        }
        if address == self.sensor_address {
            Ok(&mut self.sensor)
        } else if address == self.eeprom_address {
            Ok(&mut self.eeprom)
        } else if address == self.rtc_address {
            Ok(&mut self.rtc)
        } else if address == self.target_address {
            Ok(&mut self.target)
        } else {
            Err(BusError::NoDevice { address })
        }
    }
}

impl Default for SimBus<RecordingTarget> {
    fn default() -> Self {
        Self::new(&MasterConfig::default(), RecordingTarget::default())
    }
}

impl<T: BusDevice> BusPort for SimBus<T> {
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), BusError> {
        self.begin(address)?.write(bytes)
    }

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), BusError> {
        self.begin(address)?.read(buffer)
    }

    fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), BusError> {
        let device = self.begin(address)?;
        device.write(bytes)?;
        device.read(buffer)
    }

    fn is_busy(&mut self) -> bool {
        if self.stuck {
            return true;
        }
        if self.busy_left > 0 {
            self.busy_left -= 1;
            return true;
        }
        false
    }
}

// ── Delay ─────────────────────────────────────────────────────

/// Records requested delay instead of sleeping.
#[derive(Debug, Default)]
pub struct SimDelay {
    total_ns: u64,
}

impl SimDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns += u64::from(ms) * 1_000_000;
    }
}

// ── Console outputs ───────────────────────────────────────────

/// Master panel that logs instead of driving hardware.
#[derive(Debug, Default)]
pub struct ConsolePanel {
    alarm: bool,
    lines: Vec<String>,
}

impl ConsolePanel {
    pub fn alarm(&self) -> bool {
        self.alarm
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl IndicatorPort for ConsolePanel {
    fn set_alarm(&mut self, on: bool) {
        self.alarm = on;
        info!("master alarm line {}", if on { "HIGH" } else { "LOW" });
    }

    fn display(&mut self, text: &str) {
        info!("uart: {}", text.trim_end_matches('\r'));
        self.lines.push(text.to_owned());
    }
}

/// Slave outputs that log instead of driving hardware.
#[derive(Debug, Default)]
pub struct ConsoleOutputs {
    duty: Option<DutyLevel>,
    alarm: bool,
}

impl ConsoleOutputs {
    pub fn duty(&self) -> Option<DutyLevel> {
        self.duty
    }

    pub fn alarm(&self) -> bool {
        self.alarm
    }
}

impl ActuatorPort for ConsoleOutputs {
    fn set_duty(&mut self, level: DutyLevel) {
        self.duty = Some(level);
        info!("slave pwm {}%", level.percent());
    }

    fn set_alarm(&mut self, on: bool) {
        self.alarm = on;
        info!("slave alarm line {}", if on { "HIGH" } else { "LOW" });
    }
}

/// Slave motor with a button the scenario presses.
#[derive(Debug, Default)]
pub struct ConsoleMotor {
    pressed: bool,
    direction: Option<MotorDirection>,
}

impl ConsoleMotor {
    pub fn set_button(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    /// Last direction driven, `None` before the first write.
    pub fn direction(&self) -> Option<MotorDirection> {
        self.direction
    }
}

impl MotorPort for ConsoleMotor {
    fn button_pressed(&mut self) -> bool {
        self.pressed
    }

    fn set_direction(&mut self, direction: MotorDirection) {
        self.direction = Some(direction);
        let (a, b) = direction.lines();
        info!("slave motor lines a={} b={}", u8::from(a), u8::from(b));
    }
}
