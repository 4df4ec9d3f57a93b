//! Master orchestration loop: the monitoring side of the link.
//!
//! [`MonitorService`] owns the classification state, the alarm log, and
//! the last clock snapshot.  All I/O flows through ports injected at call
//! sites, so one poll is testable against any bus.
//!
//! ```text
//!  TickCounter ──▶ ┌──────────────────────┐ ──▶ IndicatorPort (alarm, console)
//!                  │    MonitorService    │
//!      BusPort ◀──▶│ classify · notify ·  │ ──▶ EventSink
//!                  │ log                  │
//!                  └──────────────────────┘
//! ```
//!
//! Transfers are never retried.  A failed notification is reported and the
//! new state is committed anyway, so the next poll in the same band stays
//! silent.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::alarm_log::{AlarmLog, CursorRecovery, ERASED, LogAppend};
use crate::config::MasterConfig;
use crate::error::{BusError, LogError, Result};
use crate::events::TickCounter;
use crate::sensors::clock::{RealTimeClock, TimeSnapshot};
use crate::sensors::temperature::{TemperatureSensor, TemperatureState};

use super::events::AppEvent;
use super::ports::{BusPort, EventSink, IndicatorPort};
use super::transport::BusyWait;

/// Console text shown when entering `Max`.
pub const ALARM_BANNER: &str = "Alarm!!\r";

/// What one poll observed and did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    /// Raw sensor byte.
    pub raw: u8,
    /// Classification of `raw`.
    pub state: TemperatureState,
    /// The classification differs from the previous poll.
    pub changed: bool,
    /// Outcome of the slave notification, present only when `changed`.
    pub notify: Option<core::result::Result<(), BusError>>,
    /// Outcome of the log append, present only when entering `Max`.
    pub logged: Option<core::result::Result<LogAppend, LogError>>,
    /// Snapshot read on this poll's timer tick, if any.
    pub clock: Option<TimeSnapshot>,
}

pub struct MonitorService {
    config: MasterConfig,
    sensor: TemperatureSensor,
    rtc: RealTimeClock,
    log: AlarmLog,
    wait: BusyWait,
    state: TemperatureState,
    clock: TimeSnapshot,
    polls: u64,
}

impl MonitorService {
    /// Build from a validated configuration.  Call [`start`](Self::start)
    /// before the first poll.
    pub fn new(config: MasterConfig) -> Self {
        Self {
            sensor: TemperatureSensor::new(config.sensor_address, config.sensor_register),
            rtc: RealTimeClock::new(config.rtc_address),
            log: AlarmLog::from_config(&config),
            wait: BusyWait::from_limit(config.busy_poll_limit),
            state: TemperatureState::default(),
            clock: TimeSnapshot::default(),
            polls: 0,
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Recover the log cursor from the EEPROM.
    pub fn start(&mut self, bus: &mut impl BusPort, sink: &mut impl EventSink) -> Result<()> {
        let recovery = self.log.recover(bus, &self.wait)?;
        let cursor = self.log.cursor();

        let untrusted = match recovery {
            CursorRecovery::Stored(_) => None,
            CursorRecovery::Erased => Some(ERASED),
            CursorRecovery::Corrupt(stored) => Some(stored),
        };
        if let Some(stored) = untrusted {
            sink.emit(&AppEvent::CursorRecovered { stored, cursor });
        }

        sink.emit(&AppEvent::Started { cursor });
        info!(
            "MonitorService started, log cursor 0x{:02X}, busy limit {:?}",
            cursor,
            self.wait.limit()
        );
        Ok(())
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// One pass of the main loop: clock refresh on a pending tick, sensor
    /// read, classification, and on a change the notification plus alarm
    /// and log side effects.
    ///
    /// A failed sensor read returns `Err` and leaves the state untouched.
    pub fn poll(
        &mut self,
        bus: &mut impl BusPort,
        panel: &mut impl IndicatorPort,
        delay: &mut impl DelayNs,
        ticks: &TickCounter,
        sink: &mut impl EventSink,
    ) -> Result<PollReport> {
        self.polls += 1;

        // 1. Clock display
        let clock = if ticks.take() { self.refresh_clock(bus, panel, sink) } else { None };

        // 2. Sensor
        let raw = self.sensor.read(bus, &self.wait)?;
        delay.delay_ms(self.config.poll_settle_ms);

        // 3. Classify
        let state = TemperatureState::classify(raw);
        let prev = self.state;
        let mut report = PollReport {
            raw,
            state,
            changed: state != prev,
            notify: None,
            logged: None,
            clock,
        };
        if !report.changed {
            return Ok(report);
        }

        self.state = state;
        sink.emit(&AppEvent::StateChanged { from: prev, to: state });
        info!("temperature {} -> {:?} (was {:?})", raw, state, prev);

        // 4. Notify the slave
        let notify = self.wait.write(bus, self.config.slave_address, &[state.as_byte()]);
        match notify {
            Ok(()) => sink.emit(&AppEvent::SlaveNotified(state)),
            Err(error) => {
                warn!("slave notification for {:?} failed: {}", state, error);
                sink.emit(&AppEvent::SlaveNotifyFailed { state, error });
            }
        }
        report.notify = Some(notify);

        // 5. Alarm and log
        if state.is_alarm() {
            panel.set_alarm(true);
            panel.display(ALARM_BANNER);
            sink.emit(&AppEvent::AlarmRaised);
            report.logged = Some(self.log_alarm(bus, delay, sink));
        } else if prev.is_alarm() {
            panel.set_alarm(false);
            sink.emit(&AppEvent::AlarmCleared);
        }

        Ok(report)
    }

    fn refresh_clock(
        &mut self,
        bus: &mut impl BusPort,
        panel: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) -> Option<TimeSnapshot> {
        match self.rtc.read(bus, &self.wait) {
            Ok(snapshot) => {
                self.clock = snapshot;
                panel.display(snapshot.console_line().as_str());
                sink.emit(&AppEvent::ClockRefreshed(snapshot));
                Some(snapshot)
            }
            Err(e) => {
                warn!("RTC read failed, keeping previous snapshot: {}", e);
                None
            }
        }
    }

    fn log_alarm(
        &mut self,
        bus: &mut impl BusPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> core::result::Result<LogAppend, LogError> {
        let result = self.log.append_alarm_record(bus, delay, &self.wait, &self.clock);
        match result {
            Ok(appended) => sink.emit(&AppEvent::RecordLogged {
                offset: appended.offset,
                next_cursor: appended.next_cursor,
            }),
            Err(LogError::Full { cursor }) => {
                warn!("alarm log full at 0x{:02X}, record dropped", cursor);
                sink.emit(&AppEvent::LogFull { cursor });
            }
            Err(LogError::Bus(e)) => {
                warn!("alarm log write failed: {}", e);
                sink.emit(&AppEvent::LogWriteFailed(e));
            }
        }
        result
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> TemperatureState {
        self.state
    }

    pub fn cursor(&self) -> u8 {
        self.log.cursor()
    }

    /// Last snapshot read from the RTC.
    pub fn clock(&self) -> &TimeSnapshot {
        &self.clock
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }
}
