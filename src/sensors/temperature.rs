//! Digital temperature sensor (TC74-style) and the three-band classifier.
//!
//! The sensor returns one unsigned byte in its native units (°C) from
//! register 0x00.  The classifier maps that byte onto the ordered
//! [`TemperatureState`] bands; the band byte is also the one-byte command
//! the master sends to the slave.

use log::debug;

use crate::app::ports::BusPort;
use crate::app::transport::BusyWait;
use crate::error::BusError;

/// Readings at or below this are `Idle`.
pub const IDLE_CEILING: u8 = 45;
/// Readings above `IDLE_CEILING` and at or below this are `High`.
pub const HIGH_CEILING: u8 = 50;

/// Severity band of a reading, ordered `Idle < High < Max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum TemperatureState {
    #[default]
    Idle = 0,
    High = 1,
    Max = 2,
}

impl TemperatureState {
    /// Classify a raw reading.
    pub const fn classify(raw: u8) -> Self {
        if raw <= IDLE_CEILING {
            Self::Idle
        } else if raw <= HIGH_CEILING {
            Self::High
        } else {
            Self::Max
        }
    }

    /// Wire encoding used on the master → slave link.
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Decode a command byte.  Unknown values yield `None`.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Idle),
            1 => Some(Self::High),
            2 => Some(Self::Max),
            _ => None,
        }
    }

    pub const fn is_alarm(self) -> bool {
        matches!(self, Self::Max)
    }
}

impl TryFrom<u8> for TemperatureState {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_byte(byte).ok_or(byte)
    }
}

/// Bus-attached temperature sensor.
pub struct TemperatureSensor {
    address: u8,
    register: u8,
}

impl TemperatureSensor {
    pub fn new(address: u8, register: u8) -> Self {
        Self { address, register }
    }

    /// One blocking read: point at the temperature register, read one byte.
    pub fn read(&self, bus: &mut impl BusPort, wait: &BusyWait) -> Result<u8, BusError> {
        let mut reading = [0u8; 1];
        wait.write_read(bus, self.address, &[self.register], &mut reading)?;
        debug!("sensor 0x{:02X}: raw={}", self.address, reading[0]);
        Ok(reading[0])
    }
}
