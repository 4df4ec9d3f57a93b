//! Fuzz target: alarm log boot and append
//!
//! Seeds the simulated EEPROM with arbitrary contents, boots the log from
//! it, and appends until full.  Recovery must always land on an aligned
//! slot inside the log and appends must never pass the configured limit.
//!
//! cargo fuzz run fuzz_cursor_recovery

#![no_main]

use libfuzzer_sys::fuzz_target;
use templink::adapters::sim::{SimBus, SimDelay};
use templink::alarm_log::{AlarmLog, LOG_BASE, RECORD_STRIDE};
use templink::app::transport::BusyWait;
use templink::config::MasterConfig;
use templink::sensors::clock::TimeSnapshot;

fuzz_target!(|data: &[u8]| {
    let Some((&stored, rest)) = data.split_first() else {
        return;
    };
    let config = MasterConfig::default();
    let mut bus = SimBus::default();
    bus.eeprom.set_cell(0x00, stored);
    for (i, &byte) in rest.iter().enumerate().take(255) {
        bus.eeprom.set_cell(i as u8 + 1, byte);
    }

    let wait = BusyWait::unbounded();
    let mut log = AlarmLog::from_config(&config);
    if log.recover(&mut bus, &wait).is_err() {
        return;
    }
    assert!(log.cursor() >= LOG_BASE);
    assert_eq!(log.cursor() % RECORD_STRIDE, 0);
    assert!(log.cursor() <= config.log_limit);

    let mut delay = SimDelay::default();
    let snapshot = TimeSnapshot::from_bytes([0; 7]);
    while log.append_alarm_record(&mut bus, &mut delay, &wait, &snapshot).is_ok() {
        assert!(log.cursor() <= config.log_limit);
    }
});
