//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to the
//! `log` facade (serial console on the machine, the tracing subscriber in the
//! simulator).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::config::ConfigSource;

/// Adapter that logs every [`AppEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | #{} | T={:.1}/{:.0}\u{00b0}C | duty={} | P={:.1}bar | \
                     mode={:?} | phase={:?} | fault={}",
                    t.cycle,
                    t.current_temp_c,
                    t.target_temp_c,
                    t.heater_duty,
                    t.pressure_bar,
                    t.boiler_mode,
                    t.brew_phase,
                    t.temp_fault_code,
                );
            }
            AppEvent::Started { config_source } => match config_source {
                ConfigSource::Stored => info!("START | config=stored"),
                ConfigSource::Defaults { reason } => {
                    warn!("START | config=defaults ({})", reason);
                }
            },
            AppEvent::BoilerModeChanged { from, to } => {
                info!("BOILER | {:?} -> {:?}", from, to);
            }
            AppEvent::SensorFault(code) => warn!("FAULT | temperature sensor code {}", code),
            AppEvent::SensorFaultCleared => info!("FAULT | temperature sensor cleared"),
            AppEvent::BrewPhaseChanged { from, to } => {
                info!("BREW | {:?} -> {:?}", from, to);
            }
            AppEvent::ShotFinished { duration_ms } => {
                info!("BREW | shot finished, {:.1}s", *duration_ms as f32 / 1000.0);
            }
            AppEvent::SettingsApplied => info!("CONFIG | settings applied"),
            AppEvent::SettingsRejected(e) => warn!("CONFIG | settings rejected: {}", e),
            AppEvent::SettingsSaved => info!("CONFIG | saved"),
            AppEvent::SaveFailed(e) => warn!("CONFIG | save failed: {}", e),
            AppEvent::CycleOverrun { late_by_ms } => {
                warn!("LOOP | cycle overrun by {} ms", late_by_ms);
            }
        }
    }
}
