//! Cross-context state snapshot.
//!
//! The control loop publishes a copy of its live values once per cycle;
//! other execution contexts (a display task, a telemetry task, an ISR that
//! wants the current boiler mode) read the latest copy. The value lives in a
//! critical-section mutex so a reader never sees a half-written snapshot.

use core::cell::Cell;

use embassy_sync::blocking_mutex::CriticalSectionMutex;

use crate::control::regulator::BoilerMode;
use crate::fsm::BrewPhase;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateSnapshot {
    pub cycle: u64,
    pub current_temp_c: f32,
    pub target_temp_c: f32,
    pub heater_duty: u8,
    pub pressure_bar: f32,
    pub temp_fault_code: u8,
    pub boiler_mode: BoilerMode,
    pub brew_phase: BrewPhase,
}

impl StateSnapshot {
    /// Snapshot before the first control cycle.
    pub const INITIAL: Self = Self {
        cycle: 0,
        current_temp_c: 0.0,
        target_temp_c: 0.0,
        heater_duty: 0,
        pressure_bar: 0.0,
        temp_fault_code: 0,
        boiler_mode: BoilerMode::Brew,
        brew_phase: BrewPhase::Idle,
    };
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self::INITIAL
    }
}

pub struct SharedState {
    inner: CriticalSectionMutex<Cell<StateSnapshot>>,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            inner: CriticalSectionMutex::new(Cell::new(StateSnapshot::INITIAL)),
        }
    }

    pub fn publish(&self, snapshot: StateSnapshot) {
        self.inner.lock(|cell| cell.set(snapshot));
    }

    pub fn latest(&self) -> StateSnapshot {
        self.inner.lock(Cell::get)
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
