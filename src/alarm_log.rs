//! EEPROM alarm log.
//!
//! Append-only log of alarm timestamps in an external 24Cxx EEPROM, one
//! record per 8-byte slot, with the write cursor persisted in byte 0 of
//! the same device.
//!
//! ```text
//!  offset 0x00        0x08              0x10              ...
//!         ┌──────┬───┬─────────────────┬─────────────────┬─────
//!         │cursor│ … │ record @ 0x08   │ record @ 0x10   │ …
//!         └──────┴───┴─────────────────┴─────────────────┴─────
//! ```
//!
//! ## Wire framing
//!
//! The first byte of every EEPROM write is the word address.  A record is
//! built from the RTC snapshot by shifting fields one slot toward the
//! reserved register and putting the cursor in the seconds slot:
//!
//! ```text
//!  snapshot: [sec, min, hour, rsvd, day, month, year]
//!  frame:    [cursor, sec, min, hour, day, month, year]
//! ```
//!
//! so the frame lands at word address `cursor` with the (shifted) time
//! behind it.  The follow-up cursor frame `[0x00, next]` stores `next` at
//! word address 0, which is where boot recovery reads it back.
//!
//! Every physical write is followed by a settle delay: the EEPROM is busy
//! with its internal write cycle and ignores the bus until it finishes.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::ports::BusPort;
use crate::app::transport::BusyWait;
use crate::config::MasterConfig;
use crate::error::{BusError, LogError};
use crate::sensors::clock::{self, TimeSnapshot};

/// Word address of the persisted cursor.
pub const CURSOR_ADDR: u8 = 0x00;
/// First record slot; also the cursor after first boot.
pub const LOG_BASE: u8 = 0x08;
/// Distance between record slots.
pub const RECORD_STRIDE: u8 = 8;
/// Value of an erased EEPROM cell.
pub const ERASED: u8 = 0xFF;
/// Length of the record frame (word address included).
pub const RECORD_LEN: usize = 7;

/// A record frame ready to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecord {
    frame: [u8; RECORD_LEN],
}

impl LogRecord {
    /// Build the frame for an alarm at `cursor`.
    ///
    /// Time fields move up one slot and the day-of-week register is
    /// dropped, so the frame reads `[cursor, sec, min, hour, day, month, year]`.
    pub fn from_snapshot(snapshot: &TimeSnapshot, cursor: u8) -> Self {
        let mut frame = *snapshot.as_bytes();
        frame[clock::RESERVED] = frame[clock::HOUR];
        frame[clock::HOUR] = frame[clock::MIN];
        frame[clock::MIN] = frame[clock::SEC];
        frame[clock::SEC] = cursor;
        Self { frame }
    }

    pub fn as_bytes(&self) -> &[u8; RECORD_LEN] {
        &self.frame
    }

    /// Slot this record is written to.
    pub fn offset(&self) -> u8 {
        self.frame[0]
    }
}

/// Frame that persists `next` as the cursor.
pub const fn cursor_frame(next: u8) -> [u8; 2] {
    [CURSOR_ADDR, next]
}

/// How the boot-time cursor was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorRecovery {
    /// The stored cursor was valid and is used as-is.
    Stored(u8),
    /// Byte 0 read as erased; the log starts at the base slot.
    Erased,
    /// Byte 0 held a misaligned or out-of-range offset; reset to base.
    Corrupt(u8),
}

/// Outcome of a successful append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogAppend {
    /// Slot the record was written to.
    pub offset: u8,
    /// Cursor persisted for the next append.
    pub next_cursor: u8,
}

/// Cursor owner and sole writer of the alarm log.
pub struct AlarmLog {
    device: u8,
    cursor: u8,
    limit: u8,
    settle_ms: u32,
}

impl AlarmLog {
    pub fn new(device: u8, limit: u8, settle_ms: u32) -> Self {
        Self {
            device,
            cursor: LOG_BASE,
            limit,
            settle_ms,
        }
    }

    pub fn from_config(config: &MasterConfig) -> Self {
        Self::new(config.eeprom_address, config.log_limit, config.eeprom_settle_ms)
    }

    /// Next free slot.
    pub fn cursor(&self) -> u8 {
        self.cursor
    }

    /// Boot-time policy for a stored cursor byte.  Anything that is not an
    /// aligned slot between the base and `limit` restarts the log.
    pub fn recovered_cursor(stored: u8, limit: u8) -> (u8, CursorRecovery) {
        if stored == ERASED {
            (LOG_BASE, CursorRecovery::Erased)
        } else if stored < LOG_BASE || stored > limit || stored % RECORD_STRIDE != 0 {
            (LOG_BASE, CursorRecovery::Corrupt(stored))
        } else {
            (stored, CursorRecovery::Stored(stored))
        }
    }

    /// Read the persisted cursor back from byte 0.
    pub fn recover(
        &mut self,
        bus: &mut impl BusPort,
        wait: &BusyWait,
    ) -> Result<CursorRecovery, BusError> {
        let mut stored = [0u8; 1];
        wait.write_read(bus, self.device, &[CURSOR_ADDR], &mut stored)?;

        let (cursor, recovery) = Self::recovered_cursor(stored[0], self.limit);
        self.cursor = cursor;
        match recovery {
            CursorRecovery::Stored(c) => info!("alarm log: cursor 0x{:02X} recovered", c),
            CursorRecovery::Erased => {
                info!("alarm log: erased device, starting at 0x{:02X}", LOG_BASE);
            }
            CursorRecovery::Corrupt(raw) => warn!(
                "alarm log: stored cursor 0x{:02X} is not a slot, resetting to 0x{:02X}",
                raw, LOG_BASE
            ),
        }
        Ok(recovery)
    }

    /// Write one alarm record at the cursor, persist the advanced cursor,
    /// and return where the record went.
    ///
    /// The in-RAM cursor advances as soon as the record itself is written,
    /// so a failed cursor frame never leads to the record being overwritten
    /// during this power cycle.
    pub fn append_alarm_record(
        &mut self,
        bus: &mut impl BusPort,
        delay: &mut impl DelayNs,
        wait: &BusyWait,
        snapshot: &TimeSnapshot,
    ) -> Result<LogAppend, LogError> {
        let offset = self.cursor;
        let next = offset
            .checked_add(RECORD_STRIDE)
            .filter(|next| *next <= self.limit)
            .ok_or(LogError::Full { cursor: offset })?;

        let record = LogRecord::from_snapshot(snapshot, offset);
        wait.write(bus, self.device, record.as_bytes())?;
        delay.delay_ms(self.settle_ms);
        self.cursor = next;

        wait.write(bus, self.device, &cursor_frame(next))?;
        delay.delay_ms(self.settle_ms);

        Ok(LogAppend {
            offset,
            next_cursor: next,
        })
    }
}
