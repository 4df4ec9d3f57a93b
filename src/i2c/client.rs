//! Interrupt-driven I2C client protocol engine.
//!
//! One call to [`I2cClient::on_interrupt`] per client interrupt and one to
//! [`I2cClient::on_error_interrupt`] per collision interrupt.  Each call
//! samples the status flags once, dispatches at most two handler events,
//! programs ACK/NACK, and always releases the clock stretch before
//! returning.
//!
//! ```text
//!            address (ours, accepted)
//!   Idle ───────────────────────────▶ Reading | Writing
//!    ▲  ╲                                   │
//!    │   ╲ address (foreign / declined)     │ data bytes
//!    │    ▼                                 ▼
//!    │   Ignoring ──── stop ────▶ Idle ◀── stop
//!    │
//!    └── stop ◀── Faulted ◀── collision (any state)
//! ```
//!
//! Nothing here blocks or allocates: the host is held on a stretched clock
//! for as long as a call runs.

use log::{trace, warn};

use super::common::{AckStatus, ClientError, ProtocolState, TransferDirection, TransferEvent};
use super::traits::{ClientHandler, ClientHardware, ClientRegisters};

/// Handler type for an engine that never gets a real handler registered.
pub type DefaultHandler = fn(TransferEvent, &mut dyn ClientRegisters) -> bool;

/// Declines everything: every byte is NACKed.
pub fn default_handler(_event: TransferEvent, _regs: &mut dyn ClientRegisters) -> bool {
    false
}

/// Client engine bound to one 7-bit address.
pub struct I2cClient<H, C> {
    hw: H,
    address: u8,
    handler: Option<C>,
    error: Option<ClientError>,
    state: ProtocolState,
    last_address: u8,
}

impl<H: ClientHardware, C: ClientHandler> I2cClient<H, C> {
    /// Wrap the peripheral.  Client mode stays off until [`initialize`](Self::initialize).
    pub fn new(hw: H, address: u8) -> Self {
        Self {
            hw,
            address,
            handler: None,
            error: None,
            state: ProtocolState::Idle,
            last_address: 0,
        }
    }

    /// Enable client mode and fall back to the default handler.
    pub fn initialize(&mut self) {
        self.handler = None;
        self.error = None;
        self.state = ProtocolState::Idle;
        self.hw.enable(self.address);
    }

    /// Disable client mode and fall back to the default handler.
    pub fn deinitialize(&mut self) {
        self.hw.disable();
        self.handler = None;
        self.state = ProtocolState::Idle;
    }

    /// Install `handler`, replacing the previous one.  `None` keeps
    /// whatever is installed.
    pub fn callback_register(&mut self, handler: Option<C>) {
        if let Some(handler) = handler {
            self.handler = Some(handler);
        }
    }

    pub fn write_byte(&mut self, byte: u8) {
        self.hw.write_byte(byte);
    }

    pub fn read_byte(&mut self) -> u8 {
        self.hw.read_byte()
    }

    /// 7-bit address from the most recent address byte seen.
    pub fn read_address(&self) -> u8 {
        self.last_address >> 1
    }

    pub fn transfer_direction(&self) -> TransferDirection {
        self.hw.transfer_direction()
    }

    pub fn last_byte_ack_status(&self) -> AckStatus {
        if self.hw.status().nack_pending {
            AckStatus::Nack
        } else {
            AckStatus::Ack
        }
    }

    /// Take the latched error.  A second call returns `None` until the
    /// next collision.
    pub fn error_get(&mut self) -> Option<ClientError> {
        self.error.take()
    }

    pub fn state(&self) -> ProtocolState {
        self.state
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    /// The registered handler, if any.
    pub fn handler(&self) -> Option<&C> {
        self.handler.as_ref()
    }

    // ── Interrupt entry points ────────────────────────────────

    /// Client interrupt: stop, address, or data.
    pub fn on_interrupt(&mut self) {
        let status = self.hw.status();

        if status.stop {
            if self.state != ProtocolState::Ignoring {
                self.dispatch(TransferEvent::StopBitReceived);
            }
            self.state = ProtocolState::Idle;
        } else if status.address_phase {
            self.on_address();
        } else {
            self.on_data();
        }

        self.hw.release_clock();
    }

    /// Collision interrupt.
    pub fn on_error_interrupt(&mut self) {
        if let Some(fault) = self.hw.take_fault() {
            warn!("i2c client: {}", fault);
            self.error = Some(fault);
            // A transaction addressed elsewhere only latches the fault.
            if self.state != ProtocolState::Ignoring {
                self.state = ProtocolState::Faulted;
                self.dispatch(TransferEvent::Error);
            }
        }
        self.hw.release_clock();
    }

    // ── Phases ────────────────────────────────────────────────

    fn on_address(&mut self) {
        let raw = self.hw.read_byte();
        self.last_address = raw;

        if raw >> 1 != self.address {
            trace!("i2c client: address 0x{:02X} not ours", raw >> 1);
            self.hw.set_ack(false);
            self.state = ProtocolState::Ignoring;
            return;
        }

        self.error = None;
        self.state = ProtocolState::AddressPending;

        if !self.dispatch(TransferEvent::AddressMatch) {
            self.hw.set_ack(false);
            self.state = ProtocolState::Ignoring;
            return;
        }

        // Reading the address byte cleared buffer-full.
        let status = self.hw.status();
        if status.host_reads {
            self.state = ProtocolState::Reading;
            let ack = status.buffer_full || self.dispatch(TransferEvent::TxReady);
            self.hw.set_ack(ack);
        } else {
            self.state = ProtocolState::Writing;
            self.hw.set_ack(true);
        }
    }

    fn on_data(&mut self) {
        if matches!(self.state, ProtocolState::Ignoring | ProtocolState::Faulted) {
            self.hw.set_ack(false);
            return;
        }

        let status = self.hw.status();
        if status.host_reads {
            let loadable = !status.buffer_full && !status.nack_pending;
            if loadable && !self.dispatch(TransferEvent::TxReady) {
                self.hw.set_ack(false);
            }
        } else if status.buffer_full {
            let ack = self.dispatch(TransferEvent::RxReady);
            self.hw.set_ack(ack);
        }
    }

    fn dispatch(&mut self, event: TransferEvent) -> bool {
        trace!("i2c client: {:?}", event);
        match self.handler.as_mut() {
            Some(handler) => handler.on_event(event, &mut self.hw),
            None => false,
        }
    }
}
