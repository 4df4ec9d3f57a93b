//! Recording adapters for integration tests.
//!
//! Each records every port call so tests can assert on the full output
//! history without real GPIO, PWM, or UART.  [`captured_log`] collects
//! what the logging adapters print.

#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::Once;

use log::{LevelFilter, Log, Metadata, Record};

use templink::app::events::AppEvent;
use templink::app::ports::{ActuatorPort, EventSink, IndicatorPort, MotorPort};
use templink::control::actuation::DutyLevel;
use templink::control::direction::MotorDirection;
use templink::sensors::temperature::TemperatureState;

// ── Master panel ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum PanelCall {
    Alarm(bool),
    Display(String),
}

#[derive(Default)]
pub struct MockPanel {
    pub calls: Vec<PanelCall>,
}

impl MockPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alarm_writes(&self) -> Vec<bool> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PanelCall::Alarm(on) => Some(*on),
                PanelCall::Display(_) => None,
            })
            .collect()
    }

    pub fn lines(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PanelCall::Display(text) => Some(text.as_str()),
                PanelCall::Alarm(_) => None,
            })
            .collect()
    }

    pub fn alarm_on(&self) -> bool {
        self.alarm_writes().last().copied().unwrap_or(false)
    }
}

impl IndicatorPort for MockPanel {
    fn set_alarm(&mut self, on: bool) {
        self.calls.push(PanelCall::Alarm(on));
    }

    fn display(&mut self, text: &str) {
        self.calls.push(PanelCall::Display(text.to_owned()));
    }
}

// ── Slave outputs ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCall {
    Duty(DutyLevel),
    Alarm(bool),
}

#[derive(Default)]
pub struct MockOutputs {
    pub calls: Vec<OutputCall>,
}

impl MockOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duty(&self) -> Option<DutyLevel> {
        self.calls.iter().rev().find_map(|c| match c {
            OutputCall::Duty(level) => Some(*level),
            OutputCall::Alarm(_) => None,
        })
    }

    pub fn alarm_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                OutputCall::Alarm(on) => Some(*on),
                OutputCall::Duty(_) => None,
            })
            .unwrap_or(false)
    }
}

impl ActuatorPort for MockOutputs {
    fn set_duty(&mut self, level: DutyLevel) {
        self.calls.push(OutputCall::Duty(level));
    }

    fn set_alarm(&mut self, on: bool) {
        self.calls.push(OutputCall::Alarm(on));
    }
}

// ── Slave motor ───────────────────────────────────────────────

/// Motor whose button level the test sets; records every direction write.
#[derive(Default)]
pub struct MockMotor {
    pub held: bool,
    pub writes: Vec<MotorDirection>,
}

impl MockMotor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MotorPort for MockMotor {
    fn button_pressed(&mut self) -> bool {
        self.held
    }

    fn set_direction(&mut self, direction: MotorDirection) {
        self.writes.push(direction);
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// States the master told the slave about, in order.
    pub fn notified(&self) -> Vec<TemperatureState> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::SlaveNotified(state) => Some(*state),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Log capture ──────────────────────────────────────────────

thread_local! {
    static LOG_LINES: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        let line = format!("{} {}", record.level(), record.args());
        LOG_LINES.with(|lines| lines.borrow_mut().push(line));
    }

    fn flush(&self) {}
}

static CAPTURE: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

/// Run `f` with every log level enabled and return what it logged on this
/// thread.
pub fn captured_log(f: impl FnOnce()) -> Vec<String> {
    INSTALL.call_once(|| {
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(LevelFilter::Trace);
    });
    LOG_LINES.with(|lines| lines.borrow_mut().clear());
    f();
    LOG_LINES.with(|lines| lines.borrow_mut().drain(..).collect())
}
