//! Actuation mapper for the slave device.
//!
//! Maps a received [`TemperatureState`] onto one of three PWM duty levels
//! and the alarm line.  The mapper remembers what it last drove so that
//! re-applying the same state never touches the hardware again.

use crate::app::ports::ActuatorPort;
use crate::sensors::temperature::TemperatureState;

/// The three discrete duty-cycle levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DutyLevel {
    /// 50% of the PWM scale.
    Half,
    /// 75% of the PWM scale.
    ThreeQuarter,
    /// 100% of the PWM scale.
    Full,
}

impl DutyLevel {
    pub const fn for_state(state: TemperatureState) -> Self {
        match state {
            TemperatureState::Idle => Self::Half,
            TemperatureState::High => Self::ThreeQuarter,
            TemperatureState::Max => Self::Full,
        }
    }

    /// `(numerator, denominator)` of the full scale.
    pub const fn fraction(self) -> (u8, u8) {
        match self {
            Self::Half => (1, 2),
            Self::ThreeQuarter => (3, 4),
            Self::Full => (1, 1),
        }
    }

    /// Load value for a PWM whose full scale is `max`.  Rounds down.
    pub const fn of(self, max: u16) -> u16 {
        let (num, denom) = self.fraction();
        (max as u32 * num as u32 / denom as u32) as u16
    }

    pub const fn percent(self) -> u8 {
        match self {
            Self::Half => 50,
            Self::ThreeQuarter => 75,
            Self::Full => 100,
        }
    }
}

/// Idempotent state → output mapper.
#[derive(Debug, Default)]
pub struct Actuator {
    duty: Option<DutyLevel>,
    alarm: Option<bool>,
    state: Option<TemperatureState>,
}

impl Actuator {
    pub const fn new() -> Self {
        Self {
            duty: None,
            alarm: None,
            state: None,
        }
    }

    /// Outputs a state maps to.  The alarm is on exactly in `Max`.
    pub const fn outputs_for(state: TemperatureState) -> (DutyLevel, bool) {
        (DutyLevel::for_state(state), state.is_alarm())
    }

    /// Drive the outputs for `state`, writing only what differs from the
    /// last application.  Returns `true` if any output was written.
    pub fn apply(&mut self, state: TemperatureState, hw: &mut impl ActuatorPort) -> bool {
        let (level, alarm) = Self::outputs_for(state);
        let mut changed = false;

        if self.duty != Some(level) {
            hw.set_duty(level);
            self.duty = Some(level);
            changed = true;
        }
        if self.alarm != Some(alarm) {
            hw.set_alarm(alarm);
            self.alarm = Some(alarm);
            changed = true;
        }

        self.state = Some(state);
        changed
    }

    /// Last applied state, if any.
    pub fn state(&self) -> Option<TemperatureState> {
        self.state
    }

    pub fn duty(&self) -> Option<DutyLevel> {
        self.duty
    }

    pub fn alarm(&self) -> bool {
        self.alarm.unwrap_or(false)
    }
}
