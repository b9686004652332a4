//! Outbound application events.
//!
//! The [`MachineService`](super::service::MachineService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them: log to serial, show a status line,
//! record them in a test.

use crate::config::ConfigSource;
use crate::control::regulator::BoilerMode;
use crate::error::ConfigError;
use crate::fsm::BrewPhase;

/// Structured events emitted by the control core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started; carries where the configuration came from.
    Started { config_source: ConfigSource },

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),

    /// The regulator switched between brew, steam and fault handling.
    BoilerModeChanged { from: BoilerMode, to: BoilerMode },

    /// The temperature sensor reported a (new) fault code.
    SensorFault(u8),

    /// The temperature sensor is healthy again.
    SensorFaultCleared,

    /// The brew sequencer changed phase.
    BrewPhaseChanged { from: BrewPhase, to: BrewPhase },

    /// The brew switch went OFF after a shot of this length.
    ShotFinished { duration_ms: u64 },

    /// UI settings passed validation and are now running.
    SettingsApplied,

    /// UI settings were refused; the running configuration is unchanged.
    SettingsRejected(ConfigError),

    /// The running configuration was written to persistent storage.
    SettingsSaved,

    /// Persisting the configuration failed; it stays in memory only.
    SaveFailed(ConfigError),

    /// A control cycle started late.
    CycleOverrun { late_by_ms: u64 },
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryData {
    pub cycle: u64,
    pub current_temp_c: f32,
    pub target_temp_c: f32,
    pub heater_duty: u8,
    pub pressure_bar: f32,
    pub boiler_mode: BoilerMode,
    pub brew_phase: BrewPhase,
    pub temp_fault_code: u8,
}
