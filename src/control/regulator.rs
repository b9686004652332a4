//! Mode-selected boiler regulation.
//!
//! Picks the setpoint and delegate controller for the current cycle:
//!
//! | Condition            | Target                | Delegate | Duty            |
//! |----------------------|-----------------------|----------|-----------------|
//! | sensor fault ≠ 0     | (mode target, shown)  | none     | 0               |
//! | steam switch ON      | `target_steam_temp_c` | steam    | delegate output |
//! | otherwise            | `target_brew_temp_c`  | brew PID | delegate output |
//!
//! The fault rule wins over everything else. Delegates keep their own
//! state across mode switches; nothing is reset here.

use crate::app::ports::{BoilerController, SwitchState};
use crate::config::{MachineConfig, PidGains};
use crate::sensors::temperature::TemperatureSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoilerMode {
    #[default]
    Brew,
    Steam,
    /// Sensor fault: heater held off.
    Fault,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegulatorOutput {
    pub duty: u8,
    pub target_c: f32,
    pub mode: BoilerMode,
}

pub struct BoilerRegulator<B, S> {
    brew: B,
    steam: S,
}

impl<B: BoilerController, S: BoilerController> BoilerRegulator<B, S> {
    pub fn new(brew: B, steam: S) -> Self {
        Self { brew, steam }
    }

    pub fn begin(&mut self) {
        self.brew.begin();
        self.steam.begin();
    }

    /// Duty for this cycle. Calls at most one delegate.
    pub fn regulate(
        &mut self,
        sample: &TemperatureSample,
        steam_switch: SwitchState,
        config: &MachineConfig,
    ) -> RegulatorOutput {
        let target_c = if steam_switch.is_on() {
            config.target_steam_temp_c as f32
        } else {
            config.target_brew_temp_c as f32
        };

        if sample.is_faulted() {
            return RegulatorOutput {
                duty: 0,
                target_c,
                mode: BoilerMode::Fault,
            };
        }

        if steam_switch.is_on() {
            RegulatorOutput {
                duty: self.steam.boiler_pwm_value(target_c, sample.celsius),
                target_c,
                mode: BoilerMode::Steam,
            }
        } else {
            RegulatorOutput {
                duty: self.brew.boiler_pwm_value(target_c, sample.celsius),
                target_c,
                mode: BoilerMode::Brew,
            }
        }
    }

    /// Forward new gains to the brew-mode delegate.
    pub fn change_brew_params(&mut self, gains: &PidGains) {
        self.brew.change_control_params(gains);
    }

    pub fn brew_controller(&self) -> &B {
        &self.brew
    }

    pub fn steam_controller(&self) -> &S {
        &self.steam
    }
}
