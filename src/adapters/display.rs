//! Headless display adapter.
//!
//! Implements [`DisplayPort`] without a screen: the user-editable settings,
//! the selected page and the manual pressure dial are plain fields that the
//! simulator (or a serial console) sets, and the values the control loop
//! pushes are kept for inspection. An "apply settings" press is queued with
//! [`request`](HeadlessDisplay::request) and handed out on the next
//! [`service`](DisplayPort::service) call.

use crate::app::commands::AppCommand;
use crate::app::ports::{DisplayPort, Page, SwitchState};
use crate::config::{ConfigSource, MachineConfig, PidGains, PreinfusionConfig};

/// Live values most recently pushed by the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShownValues {
    pub heater_duty: u8,
    pub temperature_c: f32,
    pub pressure_bar: f32,
    pub brew_switch: SwitchState,
    pub sensor_fault: u8,
    pub config_status: Option<ConfigSource>,
}

pub struct HeadlessDisplay {
    page: Page,
    manual_bar: f32,
    // Editable copies, as on the settings page
    brew_temp_c: u32,
    steam_temp_c: u32,
    pid: PidGains,
    preinfusion: PreinfusionConfig,
    pending: Option<AppCommand>,
    shown: ShownValues,
    begun: bool,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        let defaults = MachineConfig::default();
        Self {
            page: Page::Home,
            manual_bar: 0.0,
            brew_temp_c: defaults.target_brew_temp_c,
            steam_temp_c: defaults.target_steam_temp_c,
            pid: defaults.pid_gains,
            preinfusion: defaults.preinfusion,
            pending: None,
            shown: ShownValues::default(),
            begun: false,
        }
    }

    pub fn set_page(&mut self, page: Page) {
        self.page = page;
    }

    pub fn set_manual_pressure(&mut self, bar: f32) {
        self.manual_bar = bar;
    }

    /// Type a whole configuration into the settings page.
    pub fn edit_settings(&mut self, config: &MachineConfig) {
        self.brew_temp_c = config.target_brew_temp_c;
        self.steam_temp_c = config.target_steam_temp_c;
        self.pid = config.pid_gains;
        self.preinfusion = config.preinfusion;
    }

    /// Queue a command for the next `service()` call.
    pub fn request(&mut self, cmd: AppCommand) {
        self.pending = Some(cmd);
    }

    pub fn shown(&self) -> &ShownValues {
        &self.shown
    }

    /// Settings as currently held by the settings page.
    pub fn settings(&self) -> MachineConfig {
        MachineConfig {
            target_brew_temp_c: self.brew_temp_c,
            target_steam_temp_c: self.steam_temp_c,
            pid_gains: self.pid,
            preinfusion: self.preinfusion,
        }
    }

    pub fn is_begun(&self) -> bool {
        self.begun
    }
}

impl Default for HeadlessDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPort for HeadlessDisplay {
    fn begin(&mut self) {
        self.begun = true;
    }

    fn service(&mut self) -> Option<AppCommand> {
        self.pending.take()
    }

    fn current_page(&self) -> Page {
        self.page
    }

    fn manual_pressure(&self) -> f32 {
        self.manual_bar
    }

    fn pid_params(&self) -> PidGains {
        self.pid
    }

    fn set_pid_params(&mut self, gains: &PidGains) {
        self.pid = *gains;
    }

    fn target_temperature(&self) -> u32 {
        self.brew_temp_c
    }

    fn set_target_temperature(&mut self, celsius: u32) {
        self.brew_temp_c = celsius;
    }

    fn target_steam_temperature(&self) -> u32 {
        self.steam_temp_c
    }

    fn set_target_steam_temperature(&mut self, celsius: u32) {
        self.steam_temp_c = celsius;
    }

    fn preinfusion_params(&self) -> PreinfusionConfig {
        self.preinfusion
    }

    fn set_preinfusion_params(&mut self, params: &PreinfusionConfig) {
        self.preinfusion = *params;
    }

    fn set_boiler_state(&mut self, duty: u8) {
        self.shown.heater_duty = duty;
    }

    fn set_temperature(&mut self, celsius: f32) {
        self.shown.temperature_c = celsius;
    }

    fn set_pressure(&mut self, bar: f32) {
        self.shown.pressure_bar = bar;
    }

    fn set_brew_switch_state(&mut self, state: SwitchState) {
        self.shown.brew_switch = state;
    }

    fn set_sensor_fault(&mut self, code: u8) {
        self.shown.sensor_fault = code;
    }

    fn set_config_status(&mut self, source: ConfigSource) {
        self.shown.config_status = Some(source);
    }
}
