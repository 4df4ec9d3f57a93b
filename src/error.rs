//! Unified error types for the TempLink master and slave firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level polling loop's error handling uniform.  All variants are `Copy`
//! so they can be passed through the master loop and the event sink without
//! allocation.
//!
//! The slave-side I2C client keeps its own latched
//! [`ClientError`](crate::i2c::common::ClientError); it is drained by polling
//! and never funnels through here.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible master-side operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An I2C host transfer failed or the bus never went idle.
    Bus(BusError),
    /// The EEPROM alarm log rejected an append.
    Log(LogError),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "bus: {e}"),
            Self::Log(e) => write!(f, "log: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Bus errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// The addressed device answered NACK (address or data phase).
    Nack { address: u8 },
    /// Arbitration lost or a collision was detected on SDA.
    Collision,
    /// Misplaced start/stop or another bus-level fault.
    Bus,
    /// The busy flag never cleared within the configured poll limit.
    StuckBusy,
    /// Nothing is mapped at this address (simulation only).
    NoDevice { address: u8 },
    /// Any other transport failure.
    Other,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nack { address } => write!(f, "NACK from 0x{address:02X}"),
            Self::Collision => write!(f, "bus collision"),
            Self::Bus => write!(f, "bus fault"),
            Self::StuckBusy => write!(f, "bus stuck busy"),
            Self::NoDevice { address } => write!(f, "no device at 0x{address:02X}"),
            Self::Other => write!(f, "transport error"),
        }
    }
}

impl std::error::Error for BusError {}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}

// ---------------------------------------------------------------------------
// Alarm log errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogError {
    /// The next record would push the cursor past the configured limit.
    Full { cursor: u8 },
    /// The EEPROM transfer itself failed.
    Bus(BusError),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full { cursor } => write!(f, "log full at cursor 0x{cursor:02X}"),
            Self::Bus(e) => write!(f, "EEPROM transfer failed: {e}"),
        }
    }
}

impl std::error::Error for LogError {}

impl From<BusError> for LogError {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}

impl From<LogError> for Error {
    fn from(e: LogError) -> Self {
        Self::Log(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
