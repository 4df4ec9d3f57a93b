//! Blocking transfers over a [`BusPort`]: issue, then spin on the busy flag.
//!
//! The wait is unbounded by default, like the bare-metal driver loop it
//! replaces: a stuck bus hangs the caller.  A poll limit turns the hang
//! into [`BusError::StuckBusy`] so tests (and cautious deployments) can
//! observe it.

use log::trace;

use super::ports::BusPort;
use crate::error::BusError;

/// How long to spin on the bus busy flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyWait {
    limit: Option<u32>,
}

impl BusyWait {
    /// Spin until idle, however long that takes.
    pub const fn unbounded() -> Self {
        Self { limit: None }
    }

    /// Give up after `polls` busy observations.
    pub const fn bounded(polls: u32) -> Self {
        Self { limit: Some(polls) }
    }

    pub const fn from_limit(limit: Option<u32>) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    /// Spin while `busy()` reports true.
    pub fn wait_until(&self, mut busy: impl FnMut() -> bool) -> Result<(), BusError> {
        let mut polls: u32 = 0;
        while busy() {
            polls = polls.saturating_add(1);
            if self.limit.is_some_and(|limit| polls >= limit) {
                return Err(BusError::StuckBusy);
            }
            core::hint::spin_loop();
        }
        if polls > 0 {
            trace!("bus idle after {} polls", polls);
        }
        Ok(())
    }

    /// Spin until the transport reports idle.
    pub fn wait(&self, bus: &mut impl BusPort) -> Result<(), BusError> {
        self.wait_until(|| bus.is_busy())
    }

    // ── Blocking transfers ────────────────────────────────────

    pub fn write(&self, bus: &mut impl BusPort, address: u8, bytes: &[u8]) -> Result<(), BusError> {
        bus.write(address, bytes)?;
        self.wait(bus)
    }

    pub fn read(
        &self,
        bus: &mut impl BusPort,
        address: u8,
        buffer: &mut [u8],
    ) -> Result<(), BusError> {
        bus.read(address, buffer)?;
        self.wait(bus)
    }

    pub fn write_read(
        &self,
        bus: &mut impl BusPort,
        address: u8,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), BusError> {
        bus.write_read(address, bytes, buffer)?;
        self.wait(bus)
    }
}

impl Default for BusyWait {
    fn default() -> Self {
        Self::unbounded()
    }
}
