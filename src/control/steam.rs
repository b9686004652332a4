//! Steam-mode boiler controller.
//!
//! Bang-bang with hysteresis: heat fully until the setpoint is reached, then
//! stay off until the boiler drops a deadband below it. Output is either
//! 0 or 255.

use log::debug;

use crate::app::ports::BoilerController;
use crate::config::PidGains;

pub const DEFAULT_DEADBAND_C: f32 = 2.5;

pub struct SteamBoilerController {
    deadband_c: f32,
    heating: bool,
}

impl SteamBoilerController {
    pub fn new(deadband_c: f32) -> Self {
        Self {
            deadband_c,
            heating: false,
        }
    }

    pub fn is_heating(&self) -> bool {
        self.heating
    }
}

impl Default for SteamBoilerController {
    fn default() -> Self {
        Self::new(DEFAULT_DEADBAND_C)
    }
}

impl BoilerController for SteamBoilerController {
    fn begin(&mut self) {
        self.heating = false;
        debug!("Steam: hysteresis controller, deadband {} C", self.deadband_c);
    }

    fn boiler_pwm_value(&mut self, setpoint_c: f32, measured_c: f32) -> u8 {
        if measured_c >= setpoint_c {
            self.heating = false;
        } else if measured_c <= setpoint_c - self.deadband_c {
            self.heating = true;
        }
        if self.heating { u8::MAX } else { 0 }
    }

    fn change_control_params(&mut self, _gains: &PidGains) {
        // Gains apply to the brew PID only.
    }
}
