//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorService / ActuationService (domain)
//! ```
//!
//! Driven adapters (I2C host transport, alarm line + console, PWM, motor
//! direction, event sinks) implement these traits.  The services consume them via generics,
//! so the domain core never touches hardware directly.
//!
//! The slave's I2C client is a separate boundary: see
//! [`crate::i2c::traits`].

use crate::control::actuation::DutyLevel;
use crate::control::direction::MotorDirection;
use crate::error::BusError;

// ───────────────────────────────────────────────────────────────
// I2C host transport (master side)
// ───────────────────────────────────────────────────────────────

/// Single-master I2C transport addressed by 7-bit device address.
///
/// A transfer call starts the transaction and fills any read buffer
/// before returning; the bus may still be finishing (stop condition,
/// device-internal write) afterwards, which `is_busy` reports.  Callers
/// go through [`BusyWait`](super::transport::BusyWait) after every call.
pub trait BusPort {
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), BusError>;

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), BusError>;

    /// Write then read with a repeated start.
    fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), BusError>;

    /// Whether the last transfer is still occupying the bus.
    fn is_busy(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (master: alarm line + serial console)
// ───────────────────────────────────────────────────────────────

/// Human-facing outputs of the master device.
pub trait IndicatorPort {
    /// Drive the alarm line.
    fn set_alarm(&mut self, on: bool);

    /// Emit a line of text on the console (UART in production).
    fn display(&mut self, text: &str);
}

// ───────────────────────────────────────────────────────────────
// Actuator port (slave: PWM duty + alarm line)
// ───────────────────────────────────────────────────────────────

/// Write-side port of the slave device.
pub trait ActuatorPort {
    /// Load one of the three discrete duty-cycle levels.
    fn set_duty(&mut self, level: DutyLevel);

    /// Drive the alarm line.
    fn set_alarm(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Motor port (slave: direction lines + direction button)
// ───────────────────────────────────────────────────────────────

/// Direction side of the slave's motor driver.
pub trait MotorPort {
    /// Whether the direction button is held down right now.
    fn button_pressed(&mut self) -> bool;

    /// Drive both direction lines.
    fn set_direction(&mut self, direction: MotorDirection);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
