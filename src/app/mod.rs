//! Application core: domain logic for both devices.
//!
//! The master loop lives in [`master`], the slave's link handler and
//! actuation loop in [`slave`].  All interaction with hardware happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod events;
pub mod master;
pub mod ports;
pub mod slave;
pub mod transport;
