//! Real-time clock (DS1307-style) snapshot and console rendering.
//!
//! The RTC exposes seven BCD registers starting at 0x00:
//! `second, minute, hour, reserved (day-of-week), day, month, year`.
//! A snapshot is read by resetting the register pointer and reading all
//! seven bytes.

use core::fmt::{self, Write};

use heapless::String;

use crate::app::ports::BusPort;
use crate::app::transport::BusyWait;
use crate::error::BusError;

pub const SNAPSHOT_LEN: usize = 7;

pub const SEC: usize = 0;
pub const MIN: usize = 1;
pub const HOUR: usize = 2;
pub const RESERVED: usize = 3;
pub const DAY: usize = 4;
pub const MONTH: usize = 5;
pub const YEAR: usize = 6;

/// Capacity of a rendered console line.
pub const LINE_CAP: usize = 40;

/// Raw BCD register snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeSnapshot {
    bytes: [u8; SNAPSHOT_LEN],
}

impl TimeSnapshot {
    pub const fn from_bytes(bytes: [u8; SNAPSHOT_LEN]) -> Self {
        Self { bytes }
    }

    pub const fn as_bytes(&self) -> &[u8; SNAPSHOT_LEN] {
        &self.bytes
    }

    pub const fn second(&self) -> u8 {
        self.bytes[SEC]
    }

    pub const fn minute(&self) -> u8 {
        self.bytes[MIN]
    }

    pub const fn hour(&self) -> u8 {
        self.bytes[HOUR]
    }

    pub const fn day(&self) -> u8 {
        self.bytes[DAY]
    }

    pub const fn month(&self) -> u8 {
        self.bytes[MONTH]
    }

    pub const fn year(&self) -> u8 {
        self.bytes[YEAR]
    }

    /// `Date : YY-MM-DD <> Time : HH:MM:SS\r`
    pub fn console_line(&self) -> String<LINE_CAP> {
        let mut line = String::new();
        // 35 bytes always fit.
        let _ = write!(line, "{self}\r");
        line
    }
}

/// Two characters per BCD byte, each `'0' + nibble`.
struct Bcd(u8);

impl fmt::Display for Bcd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(char::from(b'0' + (self.0 >> 4)))?;
        f.write_char(char::from(b'0' + (self.0 & 0x0F)))
    }
}

impl fmt::Display for TimeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Date : {}-{}-{} <> Time : {}:{}:{}",
            Bcd(self.year()),
            Bcd(self.month()),
            Bcd(self.day()),
            Bcd(self.hour()),
            Bcd(self.minute()),
            Bcd(self.second()),
        )
    }
}

/// Bus-attached real-time clock.
pub struct RealTimeClock {
    address: u8,
}

impl RealTimeClock {
    pub fn new(address: u8) -> Self {
        Self { address }
    }

    /// Reset the register pointer, then read the full snapshot.
    pub fn read(&self, bus: &mut impl BusPort, wait: &BusyWait) -> Result<TimeSnapshot, BusError> {
        let mut bytes = [0u8; SNAPSHOT_LEN];
        wait.write(bus, self.address, &[0x00])?;
        wait.read(bus, self.address, &mut bytes)?;
        Ok(TimeSnapshot::from_bytes(bytes))
    }
}
