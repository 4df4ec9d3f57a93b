//! Outbound application events.
//!
//! [`MonitorService`](super::master::MonitorService) and
//! [`ActuationService`](super::slave::ActuationService) emit these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to the console, record them in a
//! test, forward them elsewhere.

use crate::control::actuation::DutyLevel;
use crate::control::direction::MotorDirection;
use crate::error::BusError;
use crate::sensors::clock::TimeSnapshot;
use crate::sensors::temperature::TemperatureState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The master finished boot; carries the recovered log cursor.
    Started { cursor: u8 },

    /// The stored cursor was not trusted and the log restarted at base.
    CursorRecovered { stored: u8, cursor: u8 },

    /// The RTC was re-read on a timer tick.
    ClockRefreshed(TimeSnapshot),

    /// The classification changed between polls.
    StateChanged { from: TemperatureState, to: TemperatureState },

    /// The slave acknowledged the new state.
    SlaveNotified(TemperatureState),

    /// The state notification was not delivered.  No retry follows.
    SlaveNotifyFailed { state: TemperatureState, error: BusError },

    /// Entered `Max`: alarm line raised.
    AlarmRaised,

    /// Left `Max`: alarm line cleared.
    AlarmCleared,

    /// An alarm record was appended to the EEPROM log.
    RecordLogged { offset: u8, next_cursor: u8 },

    /// The log has no room for another record.
    LogFull { cursor: u8 },

    /// The EEPROM append failed on the bus.
    LogWriteFailed(BusError),

    /// The slave drove its outputs for a received state.
    CommandApplied { state: TemperatureState, level: DutyLevel },

    /// The slave received a byte that is not a state.
    UnknownCommand(u8),

    /// A button press reversed the slave's motor.
    DirectionToggled(MotorDirection),
}
