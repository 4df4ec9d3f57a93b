//! Master and slave wired through the simulated bus.

use templink::adapters::log_sink::LogEventSink;
use templink::adapters::sim::{ConsoleOutputs, ConsolePanel, SimBus, SimDelay, SlaveEndpoint};
use templink::app::events::AppEvent;
use templink::app::master::MonitorService;
use templink::app::ports::BusPort;
use templink::app::slave::{ActuationService, LinkHandler};
use templink::config::MasterConfig;
use templink::control::actuation::DutyLevel;
use templink::events::{CommandQueue, TickCounter};
use templink::i2c::ProtocolState;
use templink::sensors::temperature::TemperatureState;

use crate::mock_hw::{MockOutputs, MockPanel, OutputCall, RecordingSink, captured_log};

/// Poll the master once per reading, draining the slave after each poll.
fn run_link(readings: &[u8]) -> (Vec<OutputCall>, Vec<AppEvent>, u8, u8) {
    let config = MasterConfig::default();
    let mut queue = CommandQueue::new();
    let (tx, rx) = queue.split();
    let endpoint = SlaveEndpoint::new(config.slave_address, LinkHandler::new(tx));
    let mut bus = SimBus::new(&config, endpoint);
    bus.sensor.script(readings);

    let mut slave = ActuationService::new(rx);
    let mut outputs = MockOutputs::new();
    let mut panel = MockPanel::new();
    let mut delay = SimDelay::default();
    let mut sink = RecordingSink::new();
    let ticks = TickCounter::new(0);

    let mut master = MonitorService::new(config.clone());
    master.start(&mut bus, &mut sink).expect("start");
    for _ in readings {
        master
            .poll(&mut bus, &mut panel, &mut delay, &ticks, &mut sink)
            .expect("poll");
        slave.poll(&mut outputs, &mut sink);
    }

    assert_eq!(bus.target.client().state(), ProtocolState::Idle);

    let mut echo = [0u8; 1];
    bus.read(config.slave_address, &mut echo).expect("read-back");
    (outputs.calls, sink.events, echo[0], master.cursor())
}

#[test]
fn reference_scenario_drives_slave_outputs() {
    let (calls, events, echo, cursor) = run_link(&[40, 46, 52, 52, 44]);

    assert_eq!(
        calls,
        vec![
            OutputCall::Duty(DutyLevel::ThreeQuarter),
            OutputCall::Alarm(false),
            OutputCall::Duty(DutyLevel::Full),
            OutputCall::Alarm(true),
            OutputCall::Duty(DutyLevel::Half),
            OutputCall::Alarm(false),
        ]
    );
    assert_eq!(cursor, 0x10);
    assert_eq!(echo, TemperatureState::Idle.as_byte());
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, AppEvent::CommandApplied { .. }))
            .count(),
        3
    );
}

#[test]
fn steady_reading_sends_nothing() {
    let (calls, events, echo, cursor) = run_link(&[10, 20, 30, 44]);
    assert!(calls.is_empty());
    assert!(!events.iter().any(|e| matches!(e, AppEvent::SlaveNotified(_))));
    assert_eq!(echo, 0);
    assert_eq!(cursor, 0x08);
}

#[test]
fn slave_tracks_last_band_through_oscillation() {
    let (calls, _, echo, cursor) = run_link(&[55, 48, 55, 48, 55]);

    let duties: Vec<DutyLevel> = calls
        .iter()
        .filter_map(|c| match c {
            OutputCall::Duty(level) => Some(*level),
            OutputCall::Alarm(_) => None,
        })
        .collect();
    assert_eq!(
        duties,
        vec![
            DutyLevel::Full,
            DutyLevel::ThreeQuarter,
            DutyLevel::Full,
            DutyLevel::ThreeQuarter,
            DutyLevel::Full,
        ]
    );
    assert_eq!(echo, TemperatureState::Max.as_byte());
    assert_eq!(cursor, 0x08 + 3 * 8);
}

#[test]
fn console_run_logs_every_duty_level() {
    let config = MasterConfig::default();
    let mut queue = CommandQueue::new();
    let (tx, rx) = queue.split();
    let endpoint = SlaveEndpoint::new(config.slave_address, LinkHandler::new(tx));
    let mut bus = SimBus::new(&config, endpoint);
    bus.sensor.script(&[40, 46, 52, 52, 44]);

    let mut slave = ActuationService::new(rx);
    let mut outputs = ConsoleOutputs::default();
    let mut panel = ConsolePanel::default();
    let mut delay = SimDelay::default();
    let mut sink = LogEventSink::new();
    let ticks = TickCounter::new(1);
    let mut master = MonitorService::new(config);

    let lines = captured_log(|| {
        master.start(&mut bus, &mut sink).expect("start");
        for _ in 0..5 {
            master
                .poll(&mut bus, &mut panel, &mut delay, &ticks, &mut sink)
                .expect("poll");
            slave.poll(&mut outputs, &mut sink);
        }
    });

    for expected in [
        "INFO ACT   | state=High duty=75%",
        "INFO ACT   | state=Max duty=100%",
        "INFO ACT   | state=Idle duty=50%",
        "INFO slave pwm 100%",
        "INFO ALARM | on",
        "INFO LOG   | record=0x08 next=0x10",
    ] {
        assert!(lines.iter().any(|l| l == expected), "missing {expected:?} in {lines:#?}");
    }
    assert!(panel.lines().iter().any(|l| l.starts_with("Date : ")));
    assert_eq!(outputs.duty(), Some(DutyLevel::Half));
    assert_eq!(master.polls(), 5);
}
