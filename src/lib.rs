//! TempLink firmware library.
//!
//! A master device polls a temperature sensor, classifies each reading,
//! logs alarms to an external EEPROM, and tells a slave device which band
//! it is in over I2C.  The slave's interrupt-driven I2C client hands the
//! byte to its main loop, which sets a PWM duty level and an alarm line.
//!
//! Everything here is host-testable: hardware is reached only through the
//! port traits in [`app::ports`], the client capability traits in
//! [`i2c::traits`], and `embedded-hal` traits in [`adapters`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod alarm_log;
pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod events;
pub mod i2c;
pub mod sensors;
