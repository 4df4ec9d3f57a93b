//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (the serial console in firmware, stderr in the host
//! simulator).

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] as one `TAG | key=value` line.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { cursor } => {
                info!("START | cursor=0x{:02X}", cursor);
            }
            AppEvent::CursorRecovered { stored, cursor } => {
                warn!("LOG   | stored=0x{:02X} untrusted, cursor=0x{:02X}", stored, cursor);
            }
            AppEvent::ClockRefreshed(snapshot) => {
                info!("CLOCK | {}", snapshot);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::SlaveNotified(state) => {
                info!("LINK  | sent={:?}", state);
            }
            AppEvent::SlaveNotifyFailed { state, error } => {
                warn!("LINK  | sent={:?} failed: {}", state, error);
            }
            AppEvent::AlarmRaised => {
                info!("ALARM | on");
            }
            AppEvent::AlarmCleared => {
                info!("ALARM | off");
            }
            AppEvent::RecordLogged { offset, next_cursor } => {
                info!("LOG   | record=0x{:02X} next=0x{:02X}", offset, next_cursor);
            }
            AppEvent::LogFull { cursor } => {
                warn!("LOG   | full at cursor=0x{:02X}", cursor);
            }
            AppEvent::LogWriteFailed(error) => {
                error!("LOG   | write failed: {}", error);
            }
            AppEvent::CommandApplied { state, level } => {
                info!("ACT   | state={:?} duty={}%", state, level.percent());
            }
            AppEvent::UnknownCommand(byte) => {
                warn!("ACT   | unknown command=0x{:02X}", byte);
            }
            AppEvent::DirectionToggled(direction) => {
                info!("MOTOR | dir={:?}", direction);
            }
        }
    }
}
