//! Port traits — the hexagonal boundary between the control core and the machine.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MachineService (domain)
//! ```
//!
//! Driven adapters (sensor, switches, heater, pump, display, persistence
//! medium) implement these traits. The
//! [`MachineService`](super::service::MachineService) consumes them via
//! generics, so the control core never touches hardware directly.
//!
//! Device ports are infallible from the core's point of view: a driver that
//! hits a bus error logs it and degrades to the safe value (switch reads as
//! OFF, heater de-energised). The temperature sensor reports problems through
//! its fault code instead.

use crate::app::commands::AppCommand;
use crate::config::{ConfigSource, MachineConfig, PidGains, PreinfusionConfig};
use crate::error::{ConfigError, StorageError};

// ───────────────────────────────────────────────────────────────
// Value types shared across ports
// ───────────────────────────────────────────────────────────────

/// Debounced state of a front-panel switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchState {
    On,
    #[default]
    Off,
}

impl SwitchState {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl From<bool> for SwitchState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

/// Page currently shown by the display. The brewing-manual page is what
/// puts the brew sequencer into manual pressure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    BrewingAuto,
    BrewingManual,
    Settings,
}

// ───────────────────────────────────────────────────────────────
// Device ports (driven adapters: hardware ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Boiler temperature probe (thermocouple amplifier or similar).
pub trait TemperaturePort {
    fn begin(&mut self);

    fn read_celsius(&mut self) -> f32;

    /// Non-zero when the last read is not trustworthy.
    fn sensor_fault_code(&mut self) -> u8;

    /// Acknowledge the current fault so the next read starts clean.
    fn clear_fault_code(&mut self);
}

/// Boiler heater actuator (SSR or phase-control dimmer).
pub trait HeaterPort {
    fn begin(&mut self);

    /// Heater duty, 0 = off, 255 = fully on.
    fn set_duty(&mut self, duty: u8);
}

/// Pump controller. The controller closes its own pressure loop; the core
/// only supplies the desired pressure.
pub trait PumpPort {
    fn begin(&mut self);

    fn set_desired_pressure(&mut self, bar: f32);
}

/// Brew or steam front-panel switch.
pub trait SwitchPort {
    fn begin(&mut self);

    fn is_on(&mut self) -> bool;
}

/// Pressure transducer. Initialised at startup but not part of the
/// regulation loop.
pub trait PressurePort {
    fn begin(&mut self);

    fn read_bar(&mut self) -> Option<f32>;
}

/// Every device the control cycle touches.
///
/// Accessors hand out trait objects so mocks and real drivers can be mixed
/// freely behind a single parameter.
pub trait HardwarePort {
    fn temperature(&mut self) -> &mut dyn TemperaturePort;
    fn heater(&mut self) -> &mut dyn HeaterPort;
    fn pump(&mut self) -> &mut dyn PumpPort;
    fn brew_switch(&mut self) -> &mut dyn SwitchPort;
    fn steam_switch(&mut self) -> &mut dyn SwitchPort;
    fn pressure(&mut self) -> &mut dyn PressurePort;
}

// ───────────────────────────────────────────────────────────────
// Display port (driving + driven: UI ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Display / touch UI. Holds the user-editable copies of the settings until
/// the user asks for them to be applied.
pub trait DisplayPort {
    fn begin(&mut self);

    /// Service pending UI traffic; returns a command when the user asked for
    /// one. Called on every poll, including those with no control cycle.
    fn service(&mut self) -> Option<AppCommand>;

    fn current_page(&self) -> Page;

    /// Pressure the user dialled in on the manual brewing page (bar).
    fn manual_pressure(&self) -> f32;

    fn pid_params(&self) -> PidGains;
    fn set_pid_params(&mut self, gains: &PidGains);

    fn target_temperature(&self) -> u32;
    fn set_target_temperature(&mut self, celsius: u32);

    fn target_steam_temperature(&self) -> u32;
    fn set_target_steam_temperature(&mut self, celsius: u32);

    fn preinfusion_params(&self) -> PreinfusionConfig;
    fn set_preinfusion_params(&mut self, params: &PreinfusionConfig);

    // Live values pushed every cycle
    fn set_boiler_state(&mut self, duty: u8);
    fn set_temperature(&mut self, celsius: f32);
    fn set_pressure(&mut self, bar: f32);
    fn set_brew_switch_state(&mut self, state: SwitchState);
    fn set_sensor_fault(&mut self, code: u8);

    fn set_config_status(&mut self, source: ConfigSource);
}

// ───────────────────────────────────────────────────────────────
// Boiler delegate controllers
// ───────────────────────────────────────────────────────────────

/// A closed-loop boiler controller. Implementations keep their own
/// integral/derivative state between calls.
pub trait BoilerController {
    fn begin(&mut self);

    /// Heater duty (0..=255) for the given setpoint and measurement.
    fn boiler_pwm_value(&mut self, setpoint_c: f32, measured_c: f32) -> u8;

    fn change_control_params(&mut self, gains: &PidGains);
}

// ───────────────────────────────────────────────────────────────
// Event sink (driven adapter: domain → outside world)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, display
/// status line, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Persistence
// ───────────────────────────────────────────────────────────────

/// Byte-addressed non-volatile medium (EEPROM or flash emulation).
///
/// A single `write` call must land completely before any later `read`
/// observes it.
pub trait PersistencePort {
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError>;

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError>;

    fn capacity(&self) -> usize;
}

/// Loads and persists the machine configuration record.
pub trait ConfigPort {
    /// Load the stored configuration, or report why it cannot be used.
    fn load(&self) -> Result<MachineConfig, ConfigError>;

    /// Persist the configuration, replacing the stored record.
    fn save(&mut self, config: &MachineConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait ClockPort {
    fn now_ms(&self) -> u64;
}
