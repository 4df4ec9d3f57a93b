//! Master indicator adapter: alarm GPIO plus a text console.

use core::fmt::Write;

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::IndicatorPort;

/// Drives the alarm line through an [`OutputPin`] and writes console text
/// to any [`core::fmt::Write`] sink (a UART writer in firmware).
pub struct PinIndicator<A, W> {
    alarm: A,
    console: W,
}

impl<A: OutputPin, W: Write> PinIndicator<A, W> {
    pub fn new(alarm: A, console: W) -> Self {
        Self { alarm, console }
    }

    pub fn console(&self) -> &W {
        &self.console
    }

    pub fn release(self) -> (A, W) {
        (self.alarm, self.console)
    }
}

impl<A: OutputPin, W: Write> IndicatorPort for PinIndicator<A, W> {
    fn set_alarm(&mut self, on: bool) {
        let result = if on { self.alarm.set_high() } else { self.alarm.set_low() };
        if result.is_err() {
            warn!("alarm pin write failed");
        }
    }

    fn display(&mut self, text: &str) {
        if self.console.write_str(text).is_err() {
            warn!("console write failed");
        }
    }
}
