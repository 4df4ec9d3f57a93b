//! Software model of the client peripheral.
//!
//! The bus side (`present_*`, `request_read_data`, `shift_out`,
//! `raise_*`) plays the host and the wire.  The [`ClientHardware`] side is
//! what the engine sees.  Every ACK decision and clock release is recorded
//! for assertions.

use super::common::{ClientError, ClientStatus, TransferDirection};
use super::traits::{ClientHardware, ClientRegisters};

#[derive(Debug, Default)]
pub struct SimClientHardware {
    status: ClientStatus,
    buffer: u8,
    bus_collision: bool,
    write_collision: bool,
    clock_held: bool,
    clock_releases: usize,
    acks: Vec<bool>,
    transmitted: Vec<u8>,
    enabled: Option<u8>,
}

impl SimClientHardware {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Bus side ──────────────────────────────────────────────

    /// Clock in an address byte (7-bit address << 1 | R/W).
    pub fn present_address(&mut self, raw: u8) {
        self.status.stop = false;
        self.status.address_phase = true;
        let direction = TransferDirection::from_address_byte(raw);
        self.status.host_reads = direction == TransferDirection::Read;
        self.status.buffer_full = true;
        self.buffer = raw;
        self.clock_held = true;
    }

    /// Clock in a data byte written by the host.
    pub fn present_data(&mut self, byte: u8) {
        self.status.stop = false;
        self.status.address_phase = false;
        self.status.buffer_full = true;
        self.buffer = byte;
        self.clock_held = true;
    }

    /// Host acknowledged the previous byte and clocks for another.
    pub fn request_read_data(&mut self) {
        self.status.stop = false;
        self.status.address_phase = false;
        self.status.buffer_full = false;
        self.clock_held = true;
    }

    /// Host takes the loaded transmit byte.  `None` when nothing was loaded.
    pub fn shift_out(&mut self) -> Option<u8> {
        if self.status.host_reads && self.status.buffer_full {
            self.status.buffer_full = false;
            Some(self.buffer)
        } else {
            None
        }
    }

    pub fn present_stop(&mut self) {
        self.status.stop = true;
        self.status.address_phase = false;
        self.status.buffer_full = false;
    }

    pub fn raise_bus_collision(&mut self) {
        self.bus_collision = true;
    }

    pub fn raise_write_collision(&mut self) {
        self.write_collision = true;
    }

    // ── Recorded outputs ──────────────────────────────────────

    pub fn clock_held(&self) -> bool {
        self.clock_held
    }

    pub fn clock_releases(&self) -> usize {
        self.clock_releases
    }

    /// Every ACK (`true`) / NACK (`false`) the engine programmed.
    pub fn acks(&self) -> &[bool] {
        &self.acks
    }

    pub fn last_ack(&self) -> Option<bool> {
        self.acks.last().copied()
    }

    /// Every byte loaded into the transmit register.
    pub fn transmitted(&self) -> &[u8] {
        &self.transmitted
    }

    pub fn enabled_address(&self) -> Option<u8> {
        self.enabled
    }
}

impl ClientRegisters for SimClientHardware {
    fn read_byte(&mut self) -> u8 {
        self.status.buffer_full = false;
        self.buffer
    }

    fn write_byte(&mut self, byte: u8) {
        if self.status.buffer_full {
            self.write_collision = true;
            return;
        }
        self.buffer = byte;
        self.status.buffer_full = true;
        self.transmitted.push(byte);
    }

    fn transfer_direction(&self) -> TransferDirection {
        self.status.direction()
    }
}

impl ClientHardware for SimClientHardware {
    fn status(&self) -> ClientStatus {
        self.status
    }

    fn set_ack(&mut self, ack: bool) {
        self.status.nack_pending = !ack;
        self.acks.push(ack);
    }

    fn release_clock(&mut self) {
        self.clock_held = false;
        self.clock_releases += 1;
    }

    fn take_fault(&mut self) -> Option<ClientError> {
        if self.bus_collision {
            self.bus_collision = false;
            Some(ClientError::BusCollision)
        } else if self.write_collision {
            self.write_collision = false;
            Some(ClientError::WriteCollision)
        } else {
            None
        }
    }

    fn enable(&mut self, address: u8) {
        *self = Self {
            enabled: Some(address),
            ..Self::default()
        };
    }

    fn disable(&mut self) {
        self.enabled = None;
        self.status = ClientStatus::default();
    }
}
