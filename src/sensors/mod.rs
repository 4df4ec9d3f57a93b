//! Bus-attached sensors read by the master device.
//!
//! Both are plain I2C peripherals on the master's bus; every transfer
//! goes through [`BusyWait`](crate::app::transport::BusyWait).

pub mod clock;
pub mod temperature;

pub use clock::{RealTimeClock, TimeSnapshot};
pub use temperature::{TemperatureSensor, TemperatureState};
