//! Motor direction toggle for the slave device.
//!
//! The motor driver takes two complementary direction lines.  Each press
//! of the direction button swaps them once.  Holding the button does
//! nothing more until it is released.

/// Which way the PWM-driven motor turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotorDirection {
    /// Line A high, line B low.  Power-on direction.
    #[default]
    Forward,
    /// Line A low, line B high.
    Reverse,
}

impl MotorDirection {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }

    /// Levels of the two direction lines, `(a, b)`.
    pub const fn lines(self) -> (bool, bool) {
        match self {
            Self::Forward => (true, false),
            Self::Reverse => (false, true),
        }
    }
}

/// Press-edge detector holding the current direction.
#[derive(Debug, Default)]
pub struct DirectionToggle {
    direction: MotorDirection,
    latched: bool,
}

impl DirectionToggle {
    pub const fn new() -> Self {
        Self {
            direction: MotorDirection::Forward,
            latched: false,
        }
    }

    /// Feed one button sample.  Returns the new direction when this sample
    /// starts a press.
    pub fn sample(&mut self, pressed: bool) -> Option<MotorDirection> {
        if !pressed {
            self.latched = false;
            return None;
        }
        if self.latched {
            return None;
        }
        self.latched = true;
        self.direction = self.direction.toggled();
        Some(self.direction)
    }

    pub fn direction(&self) -> MotorDirection {
        self.direction
    }
}
