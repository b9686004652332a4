//! PID controller for brew-mode boiler temperature
//!
//! Proportional-integral-derivative controller producing a heater duty in
//! 0..=255. The integration step comes from the configured sample time,
//! which the control cycle keeps equal to its own interval.

use log::info;

use crate::app::ports::BoilerController;
use crate::config::PidGains;

const OUTPUT_MIN: f64 = 0.0;
const OUTPUT_MAX: f64 = 255.0;

/// PID controller
pub struct PidBoilerController {
    gains: PidGains,
    integral: f64,
    prev_error: f64,
    /// False until the first sample; the derivative term is skipped then.
    primed: bool,
}

impl PidBoilerController {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            integral: 0.0,
            prev_error: 0.0,
            primed: false,
        }
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }

    fn dt_secs(&self) -> f64 {
        f64::from(self.gains.sample_time_ms.max(1)) / 1000.0
    }

    /// Compute PID output for one sample period.
    pub fn compute(&mut self, setpoint: f64, measurement: f64) -> f64 {
        let dt = self.dt_secs();
        let error = setpoint - measurement;

        // Proportional
        let p = self.gains.kp * error;

        // Integral (with anti-windup)
        self.integral += error * dt;
        let i = self.gains.ki * self.integral;

        // Derivative
        let derivative = if self.primed {
            (error - self.prev_error) / dt
        } else {
            0.0
        };
        let d = self.gains.kd * derivative;

        self.prev_error = error;
        self.primed = true;

        // Clamp output
        let output = (p + i + d).clamp(OUTPUT_MIN, OUTPUT_MAX);

        // Anti-windup: if output is saturated, stop integrating
        if output >= OUTPUT_MAX || output <= OUTPUT_MIN {
            self.integral -= error * dt;
        }

        output
    }

    /// Reset controller state
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = 0.0;
        self.primed = false;
    }
}

impl BoilerController for PidBoilerController {
    fn begin(&mut self) {
        self.reset();
        info!(
            "PID: kp={} ki={} kd={} dt={}ms",
            self.gains.kp, self.gains.ki, self.gains.kd, self.gains.sample_time_ms
        );
    }

    fn boiler_pwm_value(&mut self, setpoint_c: f32, measured_c: f32) -> u8 {
        let out = self.compute(f64::from(setpoint_c), f64::from(measured_c));
        // NaN (never produced from finite inputs) saturates to 0.
        out.round() as u8
    }

    fn change_control_params(&mut self, gains: &PidGains) {
        // Integral state is kept so a retune does not bump the heater.
        self.gains = *gains;
        info!(
            "PID: gains updated kp={} ki={} kd={}",
            gains.kp, gains.ki, gains.kd
        );
    }
}
