//! Output control for the slave device.

pub mod actuation;
pub mod direction;

pub use actuation::{Actuator, DutyLevel};
pub use direction::{DirectionToggle, MotorDirection};
