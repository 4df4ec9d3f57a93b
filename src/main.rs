//! TempLink host simulator.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  MonitorService ──▶ SimBus ──▶ SlaveEndpoint (I2cClient)      │
//! │       │              │ sensor · EEPROM · RTC     │            │
//! │       ▼              │                            ▼            │
//! │  ConsolePanel        │                   CommandQueue (SPSC)   │
//! │                      │                            │            │
//! │  LogEventSink ◀──────┴──────── ActuationService ◀─┘            │
//! │                                      │                         │
//! │                                      ▼                         │
//! │                               ConsoleOutputs                   │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `templink-sim [scenario.json]`.  Without a scenario the default
//! reading script `[40, 46, 52, 52, 44]` runs against default addresses.
//! `TEMPLINK_LOG` sets the log level (default `info`).  A scenario's
//! `button` list holds the slave's direction button level for each poll;
//! polls past its end see the button released.
#![deny(unused_must_use)]

use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use log::{LevelFilter, Log, Metadata, Record, info};
use serde::Deserialize;

use templink::adapters::log_sink::LogEventSink;
use templink::adapters::sim::{
    ConsoleMotor, ConsoleOutputs, ConsolePanel, SimBus, SimDelay, SlaveEndpoint,
};
use templink::app::master::MonitorService;
use templink::app::slave::{ActuationService, DirectionService, LinkHandler};
use templink::app::transport::BusyWait;
use templink::config::{MasterConfig, SlaveConfig};
use templink::events::{CommandQueue, TickCounter};
use templink::sensors::clock::{SNAPSHOT_LEN, TimeSnapshot};

// ── Logging backend ───────────────────────────────────────────

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("{:<5} {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging() -> Result<()> {
    let level = match std::env::var("TEMPLINK_LOG") {
        Ok(value) => {
            LevelFilter::from_str(&value).map_err(|e| anyhow!("TEMPLINK_LOG={value}: {e}"))?
        }
        Err(_) => LevelFilter::Info,
    };
    log::set_logger(&LOGGER).map_err(|e| anyhow!("installing logger: {e}"))?;
    log::set_max_level(level);
    Ok(())
}

// ── Scenario ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Scenario {
    master: MasterConfig,
    slave: SlaveConfig,
    /// Sensor bytes, one per poll.
    readings: Vec<u8>,
    /// RTC registers `[sec, min, hour, dow, day, month, year]`, BCD.
    clock: [u8; SNAPSHOT_LEN],
    /// Fire a timer tick before every n-th poll.  0 = boot tick only.
    tick_every: u32,
    /// Slave direction button, pressed = `true`, one entry per poll.
    button: Vec<bool>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            master: MasterConfig::default(),
            slave: SlaveConfig::default(),
            readings: vec![40, 46, 52, 52, 44],
            clock: [0x00, 0x30, 0x12, 0x01, 0x18, 0x10, 0x26],
            tick_every: 0,
            button: Vec::new(),
        }
    }
}

fn load_scenario() -> Result<Scenario> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(Scenario::default());
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading scenario {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing scenario {path}"))
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_logging()?;

    info!("TempLink simulator v{}", env!("CARGO_PKG_VERSION"));

    let scenario = load_scenario()?;
    scenario.master.validate().context("master config")?;
    scenario.slave.validate().context("slave config")?;
    if scenario.master.slave_address != scenario.slave.address {
        bail!(
            "master targets 0x{:02X} but slave listens on 0x{:02X}",
            scenario.master.slave_address,
            scenario.slave.address
        );
    }

    // ── 1. Slave: queue halves, client engine, actuation loop ─
    let mut queue = CommandQueue::new();
    let (producer, consumer) = queue.split();
    let endpoint = SlaveEndpoint::new(scenario.slave.address, LinkHandler::new(producer));
    let mut slave = ActuationService::new(consumer);
    let mut outputs = ConsoleOutputs::default();
    let mut direction = DirectionService::new();
    let mut motor = ConsoleMotor::default();
    direction.start(&mut motor);

    // ── 2. Bus and master peripherals ─────────────────────────
    let mut bus = SimBus::new(&scenario.master, endpoint);
    bus.sensor.script(&scenario.readings);
    bus.rtc.set(scenario.clock);

    let mut panel = ConsolePanel::default();
    let mut delay = SimDelay::default();
    let mut sink = LogEventSink::new();
    let ticks = TickCounter::default();

    // ── 3. Boot ───────────────────────────────────────────────
    let mut master = MonitorService::new(scenario.master.clone());
    master.start(&mut bus, &mut sink).context("master boot")?;

    // ── 4. Main loops, interleaved ────────────────────────────
    for i in 0..scenario.readings.len() {
        if scenario.tick_every > 0 && i > 0 && i % scenario.tick_every as usize == 0 {
            ticks.on_overflow();
        }
        let report = master
            .poll(&mut bus, &mut panel, &mut delay, &ticks, &mut sink)
            .with_context(|| format!("poll {i}"))?;
        slave.poll(&mut outputs, &mut sink);
        motor.set_button(scenario.button.get(i).copied().unwrap_or(false));
        direction.poll(&mut motor, &mut sink);

        info!(
            "poll {} | raw={} state={:?} changed={}",
            i, report.raw, report.state, report.changed
        );
    }

    // ── 5. Read back what the slave is acting on ──────────────
    let mut echo = [0u8; 1];
    BusyWait::from_limit(scenario.master.busy_poll_limit)
        .read(&mut bus, scenario.master.slave_address, &mut echo)
        .context("slave read-back")?;

    let stamp = TimeSnapshot::from_bytes(scenario.clock);
    info!(
        "done | polls={} slave_cmd={} cursor=0x{:02X} master_alarm={} slave_alarm={} \
         duty={:?} motor={:?} simulated={}ms clock=\"{}\"",
        master.polls(),
        echo[0],
        master.cursor(),
        panel.alarm(),
        outputs.alarm(),
        outputs.duty(),
        direction.direction(),
        delay.total_ms(),
        stamp,
    );
    Ok(())
}
