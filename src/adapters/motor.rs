//! Slave motor direction adapter: two direction lines plus the reverse
//! button.
//!
//! The button is an active-low switch with a pull-up, so a low input
//! reads as pressed.

use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::app::ports::MotorPort;
use crate::control::direction::MotorDirection;

pub struct MotorPins<A, B, S> {
    line_a: A,
    line_b: B,
    button: S,
}

impl<A: OutputPin, B: OutputPin, S: InputPin> MotorPins<A, B, S> {
    pub fn new(line_a: A, line_b: B, button: S) -> Self {
        Self { line_a, line_b, button }
    }

    pub fn release(self) -> (A, B, S) {
        (self.line_a, self.line_b, self.button)
    }
}

fn drive<P: OutputPin>(pin: &mut P, high: bool) -> bool {
    let result = if high { pin.set_high() } else { pin.set_low() };
    result.is_ok()
}

impl<A: OutputPin, B: OutputPin, S: InputPin> MotorPort for MotorPins<A, B, S> {
    fn button_pressed(&mut self) -> bool {
        match self.button.is_low() {
            Ok(low) => low,
            Err(_) => {
                // Read errors count as released.
                warn!("direction button read failed");
                false
            }
        }
    }

    fn set_direction(&mut self, direction: MotorDirection) {
        let (a, b) = direction.lines();
        if !(drive(&mut self.line_a, a) && drive(&mut self.line_b, b)) {
            warn!("motor direction write failed");
        }
    }
}
