//! `embedded-hal` I2C bridge.
//!
//! Wraps any blocking [`embedded_hal::i2c::I2c`] controller as a
//! [`BusPort`].  Those transfers return only once the stop condition is
//! on the wire, so the bus is never reported busy.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};
use log::debug;

use crate::app::ports::BusPort;
use crate::error::BusError;

pub struct HalBus<I> {
    i2c: I,
}

impl<I: I2c> HalBus<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Give the controller back.
    pub fn release(self) -> I {
        self.i2c
    }

    fn map_err(address: u8, e: I::Error) -> BusError {
        let kind = e.kind();
        debug!("i2c 0x{:02X}: {:?}", address, kind);
        match kind {
            ErrorKind::NoAcknowledge(_) => BusError::Nack { address },
            ErrorKind::ArbitrationLoss => BusError::Collision,
            ErrorKind::Bus => BusError::Bus,
            _ => BusError::Other,
        }
    }
}

impl<I: I2c> BusPort for HalBus<I> {
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), BusError> {
        self.i2c.write(address, bytes).map_err(|e| Self::map_err(address, e))
    }

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), BusError> {
        self.i2c.read(address, buffer).map_err(|e| Self::map_err(address, e))
    }

    fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), BusError> {
        self.i2c
            .write_read(address, bytes, buffer)
            .map_err(|e| Self::map_err(address, e))
    }

    fn is_busy(&mut self) -> bool {
        false
    }
}
