//! System configuration parameters
//!
//! Bus addresses, settle delays, and log bounds for both devices.
//! Temperature thresholds are not here: they are fixed constants in
//! [`crate::sensors::temperature`].

use serde::{Deserialize, Serialize};

use crate::alarm_log::{LOG_BASE, RECORD_STRIDE};
use crate::error::ConfigError;

/// Master (monitoring) device configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterConfig {
    // --- Bus map (7-bit addresses) ---
    /// Temperature sensor (TC74-style, one-byte reading)
    pub sensor_address: u8,
    /// Sensor register holding the current reading
    pub sensor_register: u8,
    /// External 24Cxx EEPROM holding the alarm log
    pub eeprom_address: u8,
    /// DS1307-style real-time clock
    pub rtc_address: u8,
    /// Slave (actuation) microcontroller
    pub slave_address: u8,

    // --- Timing ---
    /// Delay after every sensor read (milliseconds)
    pub poll_settle_ms: u32,
    /// Delay after every EEPROM write (milliseconds)
    pub eeprom_settle_ms: u32,
    /// Busy-flag polls before a transfer is declared stuck.
    /// `None` waits forever.
    pub busy_poll_limit: Option<u32>,

    // --- Alarm log ---
    /// Highest cursor value the log may persist
    pub log_limit: u8,
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            // Bus map
            sensor_address: 0x4D,
            sensor_register: 0x00,
            eeprom_address: 0x50,
            rtc_address: 0x68,
            slave_address: 0x08,

            // Timing
            poll_settle_ms: 200,
            eeprom_settle_ms: 10,
            busy_poll_limit: None,

            // Alarm log: 30 slots between 0x08 and 0xF0
            log_limit: 0xF8,
        }
    }
}

impl MasterConfig {
    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let addresses = [
            self.sensor_address,
            self.eeprom_address,
            self.rtc_address,
            self.slave_address,
        ];
        if addresses.iter().any(|a| *a > 0x7F) {
            return Err(ConfigError::ValidationFailed("bus address is not 7-bit"));
        }
        for (i, a) in addresses.iter().enumerate() {
            if addresses[i + 1..].contains(a) {
                return Err(ConfigError::ValidationFailed("two devices share a bus address"));
            }
        }
        if self.log_limit % RECORD_STRIDE != 0 {
            return Err(ConfigError::ValidationFailed("log_limit must be a multiple of 8"));
        }
        if self.log_limit <= LOG_BASE {
            return Err(ConfigError::ValidationFailed("log_limit leaves no record slot"));
        }
        if self.busy_poll_limit == Some(0) {
            return Err(ConfigError::ValidationFailed("busy_poll_limit must be non-zero"));
        }
        Ok(())
    }
}

/// Slave (actuation) device configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlaveConfig {
    /// Own 7-bit client address
    pub address: u8,
}

impl Default for SlaveConfig {
    fn default() -> Self {
        Self { address: 0x08 }
    }
}

impl SlaveConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 0x00-0x07 are reserved by the I2C specification.
        if !(0x08..=0x77).contains(&self.address) {
            return Err(ConfigError::ValidationFailed("client address outside 0x08..=0x77"));
        }
        Ok(())
    }
}
