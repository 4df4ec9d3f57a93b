//! Slave actuator adapter: PWM duty plus alarm GPIO.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::{debug, warn};

use crate::app::ports::ActuatorPort;
use crate::control::actuation::DutyLevel;

pub struct PwmAlarm<P, A> {
    pwm: P,
    alarm: A,
}

impl<P: SetDutyCycle, A: OutputPin> PwmAlarm<P, A> {
    pub fn new(pwm: P, alarm: A) -> Self {
        Self { pwm, alarm }
    }

    pub fn release(self) -> (P, A) {
        (self.pwm, self.alarm)
    }
}

impl<P: SetDutyCycle, A: OutputPin> ActuatorPort for PwmAlarm<P, A> {
    fn set_duty(&mut self, level: DutyLevel) {
        let (num, denom) = level.fraction();
        debug!("pwm: {}/{} of {}", num, denom, self.pwm.max_duty_cycle());
        if self.pwm.set_duty_cycle_fraction(num.into(), denom.into()).is_err() {
            warn!("pwm duty write failed");
        }
    }

    fn set_alarm(&mut self, on: bool) {
        let result = if on { self.alarm.set_high() } else { self.alarm.set_low() };
        if result.is_err() {
            warn!("alarm pin write failed");
        }
    }
}
