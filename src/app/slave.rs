//! Slave (actuation) side of the link.
//!
//! ```text
//!   I2C client ISR                          main loop
//!  ┌──────────────┐   CommandQueue    ┌──────────────────┐
//!  │ LinkHandler  │ ────────────────▶ │ ActuationService │ ──▶ ActuatorPort
//!  └──────────────┘   (SPSC, bytes)   └──────────────────┘
//! ```
//!
//! The handler runs in interrupt context and only moves bytes.  Decoding
//! and output changes happen in the main loop, which also samples the
//! direction button through [`DirectionService`].

use log::{debug, info, warn};

use crate::control::actuation::Actuator;
use crate::control::direction::{DirectionToggle, MotorDirection};
use crate::events::{CommandConsumer, CommandProducer};
use crate::i2c::common::TransferEvent;
use crate::i2c::traits::{ClientHandler, ClientRegisters};
use crate::sensors::temperature::TemperatureState;

use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, MotorPort};

// ───────────────────────────────────────────────────────────────
// Interrupt side
// ───────────────────────────────────────────────────────────────

/// Client handler for the master → slave command link.
///
/// Received bytes go into the command queue; a host read returns the last
/// byte received so the master can check what the slave is acting on.
pub struct LinkHandler<'a> {
    producer: CommandProducer<'a>,
    last_command: u8,
    received: u32,
    dropped: u32,
}

impl<'a> LinkHandler<'a> {
    pub fn new(producer: CommandProducer<'a>) -> Self {
        Self {
            producer,
            last_command: TemperatureState::Idle.as_byte(),
            received: 0,
            dropped: 0,
        }
    }

    pub fn last_command(&self) -> u8 {
        self.last_command
    }

    /// Bytes accepted into the queue.
    pub fn received(&self) -> u32 {
        self.received
    }

    /// Bytes NACKed because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl ClientHandler for LinkHandler<'_> {
    fn on_event(&mut self, event: TransferEvent, regs: &mut dyn ClientRegisters) -> bool {
        match event {
            TransferEvent::AddressMatch | TransferEvent::StopBitReceived => true,
            TransferEvent::RxReady => {
                let byte = regs.read_byte();
                if self.producer.post(byte) {
                    self.last_command = byte;
                    self.received = self.received.wrapping_add(1);
                    true
                } else {
                    self.dropped = self.dropped.wrapping_add(1);
                    warn!("command queue full, NACK 0x{:02X}", byte);
                    false
                }
            }
            TransferEvent::TxReady => {
                regs.write_byte(self.last_command);
                true
            }
            TransferEvent::Error => {
                warn!("link transaction aborted by bus error");
                false
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Main-loop side
// ───────────────────────────────────────────────────────────────

/// Drains received commands and drives the actuation mapper.
pub struct ActuationService<'a> {
    consumer: CommandConsumer<'a>,
    actuator: Actuator,
}

impl<'a> ActuationService<'a> {
    pub fn new(consumer: CommandConsumer<'a>) -> Self {
        Self {
            consumer,
            actuator: Actuator::new(),
        }
    }

    /// Apply every pending command in arrival order.  Returns the last
    /// state applied, or `None` if nothing decodable was pending.
    pub fn poll(
        &mut self,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Option<TemperatureState> {
        let mut applied = None;

        while let Some(byte) = self.consumer.take() {
            let Some(state) = TemperatureState::from_byte(byte) else {
                warn!("ignoring unknown command byte 0x{:02X}", byte);
                sink.emit(&AppEvent::UnknownCommand(byte));
                continue;
            };

            if self.actuator.apply(state, hw) {
                let (level, alarm) = Actuator::outputs_for(state);
                info!("actuation: {:?} -> duty {}% alarm={}", state, level.percent(), alarm);
                sink.emit(&AppEvent::CommandApplied { state, level });
            } else {
                debug!("actuation: {:?} already applied", state);
            }
            applied = Some(state);
        }

        applied
    }

    pub fn actuator(&self) -> &Actuator {
        &self.actuator
    }

    pub fn pending(&self) -> usize {
        self.consumer.pending()
    }
}

/// Button-driven motor reversal, polled once per main-loop pass.
#[derive(Debug, Default)]
pub struct DirectionService {
    toggle: DirectionToggle,
}

impl DirectionService {
    pub fn new() -> Self {
        Self {
            toggle: DirectionToggle::new(),
        }
    }

    /// Drive the power-on direction.
    pub fn start(&self, motor: &mut impl MotorPort) {
        motor.set_direction(self.toggle.direction());
    }

    /// Sample the button and reverse the motor on a fresh press.
    pub fn poll(
        &mut self,
        motor: &mut impl MotorPort,
        sink: &mut impl EventSink,
    ) -> Option<MotorDirection> {
        let next = self.toggle.sample(motor.button_pressed())?;
        motor.set_direction(next);
        info!("motor direction -> {:?}", next);
        sink.emit(&AppEvent::DirectionToggled(next));
        Some(next)
    }

    pub fn direction(&self) -> MotorDirection {
        self.toggle.direction()
    }
}
