//! Capability traits for the I2C client engine.
//!
//! ```text
//! ClientRegisters (what a handler may touch)
//!     └── ClientHardware (what the engine drives)
//! ClientHandler (injected per-event callback)
//! ```
//!
//! The engine is written against [`ClientHardware`] only.  Handlers get a
//! narrowed `&mut dyn ClientRegisters` so they can move bytes but cannot
//! touch ACK or clock control.

use super::common::{ClientError, ClientStatus, TransferDirection, TransferEvent};

/// Data-register access available from inside a handler.
pub trait ClientRegisters {
    /// Take the received byte.  Clears buffer-full.
    fn read_byte(&mut self) -> u8;

    /// Load the next byte to transmit.
    fn write_byte(&mut self, byte: u8);

    fn transfer_direction(&self) -> TransferDirection;
}

/// Full peripheral interface driven by the engine.
pub trait ClientHardware: ClientRegisters {
    /// Sample the status flags.
    fn status(&self) -> ClientStatus;

    /// Set the acknowledge bit and start the acknowledge sequence.
    fn set_ack(&mut self, ack: bool);

    /// Release the clock stretch.  Must follow every interrupt.
    fn release_clock(&mut self);

    /// Read and clear the collision flags.  Bus collision wins when both
    /// are set; the other flag stays set for the next error interrupt.
    fn take_fault(&mut self) -> Option<ClientError>;

    /// Enable client mode at a 7-bit address with interrupts on.
    fn enable(&mut self, address: u8);

    /// Disable client mode and its interrupts.
    fn disable(&mut self);
}

/// Application callback.  Runs in interrupt context: must not block.
pub trait ClientHandler {
    fn on_event(&mut self, event: TransferEvent, regs: &mut dyn ClientRegisters) -> bool;
}

impl<F> ClientHandler for F
where
    F: FnMut(TransferEvent, &mut dyn ClientRegisters) -> bool,
{
    fn on_event(&mut self, event: TransferEvent, regs: &mut dyn ClientRegisters) -> bool {
        self(event, regs)
    }
}
