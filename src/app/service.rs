//! Machine service — the hexagonal core.
//!
//! [`MachineService`] owns the running configuration, the runtime state,
//! the boiler regulator and the brew sequencer. All I/O flows through port
//! traits injected at call sites, so the whole control cycle runs against
//! mock adapters in tests and against the simulator on a host.
//!
//! ```text
//!  HardwarePort ◀─▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                   │        MachineService        │
//!  DisplayPort  ◀─▶ │ Acquire · Regulate · Sequence│ ──▶ SharedState
//!                   └──────────────────────────────┘
//!                                ▲
//!                           ConfigPort
//! ```
//!
//! ## Control cycle
//!
//! [`poll`](MachineService::poll) is called from the main loop as often as
//! it likes. The display is serviced on every poll; once more than
//! [`SAMPLE_INTERVAL_MS`] has passed since the previous cycle a full cycle
//! runs, in this order:
//!
//! 1. acquire the boiler temperature (fault code acknowledged on the sensor)
//! 2. regulate: pick mode and delegate, compute the heater duty
//! 3. drive the heater
//! 4. sequence the brew phase and command the pump
//! 5. push live values to the display and publish the shared snapshot

use std::sync::Arc;

use log::{info, warn};

use crate::config::{ConfigSource, MachineConfig, SAMPLE_INTERVAL_MS};
use crate::control::pid::PidBoilerController;
use crate::control::regulator::{BoilerMode, BoilerRegulator};
use crate::control::steam::SteamBoilerController;
use crate::diagnostics::Diagnostics;
use crate::error::ConfigError;
use crate::fsm::context::{BrewInputs, BrewMode};
use crate::fsm::{BrewPhase, BrewSequencer};
use crate::scheduler::CycleScheduler;
use crate::sensors::temperature::{NO_FAULT, TemperatureAcquisition, TemperatureSample};
use crate::shared::{SharedState, StateSnapshot};

use super::commands::AppCommand;
use super::events::{AppEvent, TelemetryData};
use super::ports::{
    BoilerController, ConfigPort, DisplayPort, EventSink, HardwarePort, SwitchState,
};

/// Telemetry is emitted every this many control cycles (1 Hz).
pub const TELEMETRY_EVERY_CYCLES: u64 = 10;

// ───────────────────────────────────────────────────────────────
// Runtime state
// ───────────────────────────────────────────────────────────────

/// Live values of the control loop. Mutated only by the service.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RuntimeState {
    /// Last fault-free boiler temperature.
    pub current_temp_c: f32,
    pub temp_fault_code: u8,
    pub target_temp_c: f32,
    pub heater_duty: u8,
    /// Pressure commanded to the pump this cycle.
    pub pressure_bar: f32,
    pub brew_switch: SwitchState,
    pub steam_switch: SwitchState,
    pub last_cycle_ms: u64,
    pub brew_start_ms: Option<u64>,
}

// ───────────────────────────────────────────────────────────────
// MachineService
// ───────────────────────────────────────────────────────────────

pub struct MachineService<B = PidBoilerController, S = SteamBoilerController> {
    config: MachineConfig,
    config_source: ConfigSource,
    state: RuntimeState,
    acquisition: TemperatureAcquisition,
    regulator: BoilerRegulator<B, S>,
    sequencer: BrewSequencer,
    scheduler: CycleScheduler,
    diagnostics: Diagnostics,
    shared: Arc<SharedState>,
    boiler_mode: BoilerMode,
}

impl MachineService<PidBoilerController, SteamBoilerController> {
    /// Service with the reference PID and hysteresis delegates.
    pub fn with_default_controllers() -> Self {
        let config = MachineConfig::default();
        Self::new(
            PidBoilerController::new(config.pid_gains),
            SteamBoilerController::default(),
        )
    }
}

impl<B: BoilerController, S: BoilerController> MachineService<B, S> {
    /// Construct the service around the brew and steam delegates.
    ///
    /// Runs on factory defaults until [`start`](Self::start) loads the
    /// stored configuration.
    pub fn new(brew: B, steam: S) -> Self {
        let config = MachineConfig::default();
        Self {
            config,
            config_source: ConfigSource::Defaults {
                reason: ConfigError::NotLoaded,
            },
            state: RuntimeState::default(),
            acquisition: TemperatureAcquisition::new(),
            regulator: BoilerRegulator::new(brew, steam),
            sequencer: BrewSequencer::new(config.preinfusion),
            scheduler: CycleScheduler::new(SAMPLE_INTERVAL_MS),
            diagnostics: Diagnostics::new(),
            shared: Arc::new(SharedState::new()),
            boiler_mode: BoilerMode::Brew,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Load the configuration, initialise every collaborator and push the
    /// initial values to the display.
    pub fn start(
        &mut self,
        store: &impl ConfigPort,
        hw: &mut impl HardwarePort,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        match store.load() {
            Ok(cfg) => {
                let cfg = cfg.with_fixed_sample_time();
                match cfg.validate() {
                    Ok(()) => {
                        self.config = cfg;
                        self.config_source = ConfigSource::Stored;
                        info!("Configuration loaded from storage");
                    }
                    Err(reason) => {
                        self.config_source = ConfigSource::Defaults { reason };
                        warn!("Stored configuration out of range ({reason}), using defaults");
                    }
                }
            }
            Err(reason) => {
                // Keep the values already in memory (factory defaults).
                self.config_source = ConfigSource::Defaults { reason };
                warn!("Stored configuration unusable ({reason}), using defaults");
            }
        }
        self.regulator.change_brew_params(&self.config.pid_gains);

        display.begin();
        hw.pump().begin();
        hw.brew_switch().begin();
        hw.steam_switch().begin();
        hw.temperature().begin();
        hw.heater().begin();
        self.regulator.begin();
        hw.pressure().begin();

        self.push_settings(display);
        self.push_live_values(display);

        sink.emit(&AppEvent::Started {
            config_source: self.config_source,
        });
        info!(
            "MachineService started: brew {} C, steam {} C",
            self.config.target_brew_temp_c, self.config.target_steam_temp_c
        );
    }

    // ── Per-poll orchestration ────────────────────────────────

    /// Service the display and, when due, run one control cycle.
    ///
    /// Returns `true` if a control cycle ran.
    pub fn poll(
        &mut self,
        now_ms: u64,
        hw: &mut impl HardwarePort,
        display: &mut impl DisplayPort,
        store: &mut impl ConfigPort,
        sink: &mut impl EventSink,
    ) -> bool {
        if let Some(cmd) = display.service() {
            self.handle_command(cmd, display, store, sink);
        }

        if !self.scheduler.is_due(now_ms) {
            return false;
        }
        self.run_cycle(now_ms, hw, display, sink);
        true
    }

    fn run_cycle(
        &mut self,
        now_ms: u64,
        hw: &mut impl HardwarePort,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        if let Some(late_by_ms) = self.scheduler.mark_cycle(now_ms) {
            warn!("Control cycle overrun: started {} ms late", late_by_ms);
            self.diagnostics.record_overrun();
            sink.emit(&AppEvent::CycleOverrun { late_by_ms });
        }
        self.diagnostics.record_cycle();

        // 1. Acquire
        let sample = self.acquisition.sample(hw.temperature());
        self.track_sensor_fault(now_ms, &sample, sink);
        if let Some(celsius) = self.acquisition.last_valid_celsius() {
            self.state.current_temp_c = celsius;
        }
        self.state.temp_fault_code = self.acquisition.last_fault_code();

        // 2. Regulate
        self.state.steam_switch = SwitchState::from(hw.steam_switch().is_on());
        let out = self
            .regulator
            .regulate(&sample, self.state.steam_switch, &self.config);
        self.state.target_temp_c = out.target_c;
        self.state.heater_duty = out.duty;
        if out.mode != self.boiler_mode {
            info!("Boiler mode {:?} -> {:?}", self.boiler_mode, out.mode);
            sink.emit(&AppEvent::BoilerModeChanged {
                from: self.boiler_mode,
                to: out.mode,
            });
            self.boiler_mode = out.mode;
        }

        // 3. Actuate
        hw.heater().set_duty(out.duty);

        // 4. Sequence
        self.state.brew_switch = SwitchState::from(hw.brew_switch().is_on());
        let inputs = BrewInputs {
            switch: self.state.brew_switch,
            mode: BrewMode::from(display.current_page()),
            manual_bar: display.manual_pressure(),
            now_ms,
        };
        let step = self
            .sequencer
            .step(inputs, &self.config.preinfusion, hw.pump());
        self.state.pressure_bar = step.desired_bar;
        self.state.brew_start_ms = step.brew_start_ms;
        if let Some((from, to)) = step.transition {
            sink.emit(&AppEvent::BrewPhaseChanged { from, to });
        }
        if let Some(duration_ms) = step.finished_shot_ms {
            info!("Shot finished after {:.1} s", duration_ms as f32 / 1000.0);
            sink.emit(&AppEvent::ShotFinished { duration_ms });
        }

        // 5. Present
        self.push_live_values(display);
        self.state.last_cycle_ms = now_ms;
        self.shared.publish(self.snapshot());

        if self.diagnostics.cycles() % TELEMETRY_EVERY_CYCLES == 0 {
            sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
        }
    }

    fn track_sensor_fault(
        &mut self,
        now_ms: u64,
        sample: &TemperatureSample,
        sink: &mut impl EventSink,
    ) {
        let previous = self.state.temp_fault_code;
        if sample.is_faulted() {
            self.diagnostics.record_fault(now_ms, sample.fault_code);
            if sample.fault_code != previous {
                sink.emit(&AppEvent::SensorFault(sample.fault_code));
            }
        } else if previous != NO_FAULT {
            sink.emit(&AppEvent::SensorFaultCleared);
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a command from the user interface.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        display: &mut impl DisplayPort,
        store: &mut impl ConfigPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::ApplySettings => self.apply_settings(display, store, sink),
        }
    }

    fn apply_settings(
        &mut self,
        display: &mut impl DisplayPort,
        store: &mut impl ConfigPort,
        sink: &mut impl EventSink,
    ) {
        let candidate = MachineConfig {
            target_brew_temp_c: display.target_temperature(),
            target_steam_temp_c: display.target_steam_temperature(),
            pid_gains: display.pid_params(),
            preinfusion: display.preinfusion_params(),
        }
        .with_fixed_sample_time();

        if let Err(e) = candidate.validate() {
            warn!("Settings rejected: {e}");
            sink.emit(&AppEvent::SettingsRejected(e));
            // Show the values that are actually running.
            self.push_settings(display);
            return;
        }

        self.config = candidate;
        self.regulator.change_brew_params(&self.config.pid_gains);
        display.set_pid_params(&self.config.pid_gains);
        sink.emit(&AppEvent::SettingsApplied);
        info!(
            "Settings applied: brew {} C, steam {} C",
            self.config.target_brew_temp_c, self.config.target_steam_temp_c
        );

        match store.save(&self.config) {
            Ok(()) => {
                self.diagnostics.record_save(true);
                self.config_source = ConfigSource::Stored;
                display.set_config_status(self.config_source);
                sink.emit(&AppEvent::SettingsSaved);
                info!("Settings saved");
            }
            Err(e) => {
                self.diagnostics.record_save(false);
                warn!("Settings save failed, running values kept in memory: {e}");
                sink.emit(&AppEvent::SaveFailed(e));
            }
        }
    }

    // ── Display ───────────────────────────────────────────────

    fn push_settings(&self, display: &mut impl DisplayPort) {
        display.set_target_temperature(self.config.target_brew_temp_c);
        display.set_target_steam_temperature(self.config.target_steam_temp_c);
        display.set_pid_params(&self.config.pid_gains);
        display.set_preinfusion_params(&self.config.preinfusion);
        display.set_config_status(self.config_source);
    }

    fn push_live_values(&self, display: &mut impl DisplayPort) {
        display.set_boiler_state(self.state.heater_duty);
        display.set_temperature(self.state.current_temp_c);
        display.set_pressure(self.state.pressure_bar);
        display.set_brew_switch_state(self.state.brew_switch);
        display.set_sensor_fault(self.state.temp_fault_code);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn config_source(&self) -> ConfigSource {
        self.config_source
    }

    pub fn runtime_state(&self) -> &RuntimeState {
        &self.state
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn boiler_mode(&self) -> BoilerMode {
        self.boiler_mode
    }

    pub fn brew_phase(&self) -> BrewPhase {
        self.sequencer.phase()
    }

    pub fn regulator(&self) -> &BoilerRegulator<B, S> {
        &self.regulator
    }

    /// Handle for readers in other execution contexts.
    pub fn shared_state(&self) -> Arc<SharedState> {
        Arc::clone(&self.shared)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            cycle: self.diagnostics.cycles(),
            current_temp_c: self.state.current_temp_c,
            target_temp_c: self.state.target_temp_c,
            heater_duty: self.state.heater_duty,
            pressure_bar: self.state.pressure_bar,
            temp_fault_code: self.state.temp_fault_code,
            boiler_mode: self.boiler_mode,
            brew_phase: self.sequencer.phase(),
        }
    }

    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            cycle: self.diagnostics.cycles(),
            current_temp_c: self.state.current_temp_c,
            target_temp_c: self.state.target_temp_c,
            heater_duty: self.state.heater_duty,
            pressure_bar: self.state.pressure_bar,
            boiler_mode: self.boiler_mode,
            brew_phase: self.sequencer.phase(),
            temp_fault_code: self.state.temp_fault_code,
        }
    }
}
