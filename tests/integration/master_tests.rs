//! Master loop against the simulated bus and a byte-exact mock bus.

use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

use templink::adapters::hal_bus::HalBus;
use templink::adapters::sim::{SimBus, SimDelay};
use templink::alarm_log::{LOG_BASE, RECORD_STRIDE};
use templink::app::events::AppEvent;
use templink::app::master::{ALARM_BANNER, MonitorService, PollReport};
use templink::config::MasterConfig;
use templink::error::{BusError, Error, LogError};
use templink::events::TickCounter;
use templink::sensors::temperature::TemperatureState;

use crate::mock_hw::{MockPanel, RecordingSink};

struct Master {
    bus: SimBus,
    panel: MockPanel,
    delay: SimDelay,
    ticks: TickCounter,
    sink: RecordingSink,
    service: MonitorService,
}

impl Master {
    fn boot(config: MasterConfig, bus: SimBus) -> Self {
        let mut m = Self {
            bus,
            panel: MockPanel::new(),
            delay: SimDelay::default(),
            ticks: TickCounter::new(0),
            sink: RecordingSink::new(),
            service: MonitorService::new(config),
        };
        m.service.start(&mut m.bus, &mut m.sink).expect("boot");
        m
    }

    fn with_readings(readings: &[u8]) -> Self {
        let mut bus = SimBus::default();
        bus.sensor.script(readings);
        Self::boot(MasterConfig::default(), bus)
    }

    fn poll(&mut self) -> Result<PollReport, Error> {
        self.service
            .poll(&mut self.bus, &mut self.panel, &mut self.delay, &self.ticks, &mut self.sink)
    }

    fn run(&mut self, n: usize) -> Vec<PollReport> {
        (0..n).map(|_| self.poll().expect("poll")).collect()
    }
}

// ── Notification and alarm sequence ──────────────────────────

#[test]
fn reference_sequence_notifies_on_changes_only() {
    let mut m = Master::with_readings(&[40, 46, 52, 52, 44]);
    let reports = m.run(5);

    let changed: Vec<bool> = reports.iter().map(|r| r.changed).collect();
    assert_eq!(changed, vec![false, true, true, false, true]);

    assert_eq!(m.bus.target.writes(), &[vec![1u8], vec![2u8], vec![0u8]]);
    assert_eq!(
        m.sink.notified(),
        vec![TemperatureState::High, TemperatureState::Max, TemperatureState::Idle]
    );

    // One append, cursor 8 -> 16.
    let logged: Vec<_> = reports.iter().filter_map(|r| r.logged).collect();
    assert_eq!(logged.len(), 1);
    assert_eq!(m.service.cursor(), 0x10);
    assert_eq!(m.bus.eeprom.cell(0x00), 0x10);

    assert_eq!(m.panel.alarm_writes(), vec![true, false]);
    assert_eq!(m.panel.lines(), vec![ALARM_BANNER]);
}

#[test]
fn each_poll_settles_for_the_configured_delay() {
    let mut m = Master::with_readings(&[10, 10, 10]);
    m.run(3);
    assert_eq!(m.delay.total_ms(), 3 * 200);
    assert_eq!(m.service.polls(), 3);
}

#[test]
fn sensor_is_read_from_the_configured_register() {
    let mut m = Master::with_readings(&[30]);
    m.run(1);
    assert_eq!(m.bus.sensor.pointer(), 0x00);

    let config = MasterConfig {
        sensor_register: 0x02,
        ..MasterConfig::default()
    };
    let mut bus = SimBus::default();
    bus.sensor.script(&[30]);
    let mut m = Master::boot(config, bus);
    m.run(1);
    assert_eq!(m.bus.sensor.pointer(), 0x02);
    assert_eq!(m.bus.sensor.remaining(), 0);
}

#[test]
fn max_entry_costs_two_eeprom_settles() {
    let mut m = Master::with_readings(&[99]);
    m.run(1);
    assert_eq!(m.delay.total_ms(), 200 + 2 * 10);
}

#[test]
fn high_to_idle_does_not_touch_alarm() {
    let mut m = Master::with_readings(&[48, 30]);
    m.run(2);
    assert!(m.panel.alarm_writes().is_empty());
    assert_eq!(m.sink.count(|e| matches!(e, AppEvent::AlarmCleared)), 0);
}

#[test]
fn max_to_high_clears_alarm() {
    let mut m = Master::with_readings(&[70, 50]);
    m.run(2);
    assert_eq!(m.panel.alarm_writes(), vec![true, false]);
    assert!(!m.panel.alarm_on());
}

// ── Cursor persistence ───────────────────────────────────────

#[test]
fn every_max_entry_appends_one_stride() {
    let mut m = Master::with_readings(&[60, 20, 60, 20, 60]);
    m.run(5);
    assert_eq!(m.service.cursor(), LOG_BASE + 3 * RECORD_STRIDE);
    assert_eq!(m.sink.count(|e| matches!(e, AppEvent::RecordLogged { .. })), 3);
}

#[test]
fn reboot_resumes_from_persisted_cursor() {
    let mut first = Master::with_readings(&[60, 20, 60]);
    first.run(3);
    assert_eq!(first.service.cursor(), 0x18);

    let mut bus = first.bus;
    bus.sensor.script(&[60]);
    let mut second = Master::boot(MasterConfig::default(), bus);
    assert_eq!(second.service.cursor(), 0x18);
    assert!(second.sink.events.contains(&AppEvent::Started { cursor: 0x18 }));

    second.run(1);
    assert_eq!(second.service.cursor(), 0x20);
    assert_eq!(second.bus.eeprom.cell(0x00), 0x20);
}

#[test]
fn corrupt_cursor_restarts_at_base() {
    let mut bus = SimBus::default();
    bus.eeprom.set_cell(0x00, 0x13);
    let m = Master::boot(MasterConfig::default(), bus);
    assert_eq!(m.service.cursor(), LOG_BASE);
    assert!(
        m.sink
            .events
            .contains(&AppEvent::CursorRecovered { stored: 0x13, cursor: LOG_BASE })
    );
}

#[test]
fn full_log_drops_records_but_keeps_alarm() {
    let config = MasterConfig {
        log_limit: 0x18,
        ..MasterConfig::default()
    };
    let mut bus = SimBus::default();
    bus.sensor.script(&[60, 20, 60, 20, 60]);
    let mut m = Master::boot(config, bus);

    let reports = m.run(5);
    assert_eq!(m.service.cursor(), 0x18);
    assert_eq!(reports[4].logged, Some(Err(LogError::Full { cursor: 0x18 })));
    assert_eq!(m.panel.alarm_writes(), vec![true, false, true, false, true]);
    assert_eq!(m.sink.count(|e| matches!(e, AppEvent::LogFull { .. })), 1);
}

// ── Clock ─────────────────────────────────────────────────────

#[test]
fn boot_tick_displays_clock_once() {
    let mut bus = SimBus::default();
    bus.rtc.set([0x45, 0x59, 0x23, 0x07, 0x31, 0x12, 0x99]);
    bus.sensor.script(&[20, 20]);
    let mut m = Master::boot(MasterConfig::default(), bus);
    m.ticks = TickCounter::default();

    let reports = m.run(2);
    assert!(reports[0].clock.is_some());
    assert!(reports[1].clock.is_none());
    assert_eq!(m.panel.lines(), vec!["Date : 99-12-31 <> Time : 23:59:45\r"]);
}

#[test]
fn alarm_record_uses_last_displayed_clock() {
    let mut bus = SimBus::default();
    bus.rtc.set([0x10, 0x20, 0x08, 0x03, 0x05, 0x06, 0x24]);
    bus.sensor.script(&[20, 60]);
    let mut m = Master::boot(MasterConfig::default(), bus);
    m.ticks.on_overflow();
    m.run(1);

    // The RTC moves on but no tick is pending: the record keeps the old time.
    m.bus.rtc.set([0x11, 0x21, 0x09, 0x03, 0x05, 0x06, 0x24]);
    m.run(1);
    assert_eq!(m.bus.eeprom.slice(0x08, 6), &[0x10, 0x20, 0x08, 0x05, 0x06, 0x24]);
}

// ── Bus failures ─────────────────────────────────────────────

#[test]
fn busy_bus_is_waited_out() {
    let config = MasterConfig {
        busy_poll_limit: Some(50),
        ..MasterConfig::default()
    };
    let mut bus = SimBus::default();
    bus.set_busy_cycles(5);
    bus.sensor.script(&[40, 46, 52, 52, 44]);
    let mut m = Master::boot(config, bus);
    m.run(5);
    assert_eq!(m.bus.target.writes().len(), 3);
    assert_eq!(m.service.cursor(), 0x10);
}

#[test]
fn stuck_bus_aborts_poll_without_state_change() {
    let config = MasterConfig {
        busy_poll_limit: Some(8),
        ..MasterConfig::default()
    };
    let mut bus = SimBus::default();
    bus.sensor.script(&[60]);
    let mut m = Master::boot(config, bus);

    m.bus.set_stuck(true);
    assert_eq!(m.poll(), Err(Error::Bus(BusError::StuckBusy)));
    assert_eq!(m.service.state(), TemperatureState::Idle);
}

#[test]
fn missing_slave_is_reported_not_retried() {
    let mut bus = SimBus::default();
    bus.sensor.script(&[60, 60]);
    bus.set_nack(Some(0x08));
    let mut m = Master::boot(MasterConfig::default(), bus);

    let reports = m.run(2);
    assert_eq!(reports[0].notify, Some(Err(BusError::Nack { address: 0x08 })));
    assert_eq!(reports[1].notify, None);
    // Local side effects still ran.
    assert_eq!(m.panel.alarm_writes(), vec![true]);
    assert_eq!(m.service.cursor(), 0x10);
}

// ── Byte-exact wire traffic ──────────────────────────────────

#[test]
fn wire_traffic_for_boot_tick_and_alarm() {
    let clock = [0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01];
    let expectations = [
        // Boot: cursor from byte 0 of an erased device.
        I2cTransaction::write_read(0x50, vec![0x00], vec![0xFF]),
        // Tick: RTC pointer reset, then seven registers.
        I2cTransaction::write(0x68, vec![0x00]),
        I2cTransaction::read(0x68, clock.to_vec()),
        // Sensor.
        I2cTransaction::write_read(0x4D, vec![0x00], vec![51]),
        // Notification.
        I2cTransaction::write(0x08, vec![0x02]),
        // Record frame, then cursor frame.
        I2cTransaction::write(0x50, vec![0x08, 0x07, 0x06, 0x05, 0x03, 0x02, 0x01]),
        I2cTransaction::write(0x50, vec![0x00, 0x10]),
    ];
    let mut bus = HalBus::new(I2cMock::new(&expectations));
    let mut sink = RecordingSink::new();
    let mut panel = MockPanel::new();
    let mut service = MonitorService::new(MasterConfig::default());

    service.start(&mut bus, &mut sink).unwrap();
    let report = service
        .poll(&mut bus, &mut panel, &mut SimDelay::default(), &TickCounter::default(), &mut sink)
        .unwrap();

    assert_eq!(report.state, TemperatureState::Max);
    assert_eq!(panel.lines(), vec!["Date : 01-02-03 <> Time : 05:06:07\r", ALARM_BANNER]);
    bus.release().done();
}
