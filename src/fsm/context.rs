//! Shared mutable context threaded through every brew-phase handler.
//!
//! `BrewContext` holds this cycle's inputs (switch, UI mode, manual
//! pressure, clock), the shot profile, the latched shot start time, and the
//! single pressure command the handlers produce.

use crate::app::ports::{Page, SwitchState};
use crate::config::PreinfusionConfig;

// ---------------------------------------------------------------------------
// Cycle inputs (read-only to state handlers; written by the sequencer)
// ---------------------------------------------------------------------------

/// How pressure is chosen while the brew switch is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrewMode {
    /// Pressure follows the UI's manual pressure every cycle.
    Manual,
    /// Pressure follows the preinfusion / soak / brew profile.
    #[default]
    Automatic,
}

impl From<Page> for BrewMode {
    fn from(page: Page) -> Self {
        match page {
            Page::BrewingManual => Self::Manual,
            _ => Self::Automatic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BrewInputs {
    pub switch: SwitchState,
    pub mode: BrewMode,
    /// Manual pressure from the UI (bar).
    pub manual_bar: f32,
    /// Monotonic time of this cycle (ms).
    pub now_ms: u64,
}

// ---------------------------------------------------------------------------
// BrewContext
// ---------------------------------------------------------------------------

pub struct BrewContext {
    // -- Inputs --
    pub inputs: BrewInputs,
    pub profile: PreinfusionConfig,

    // -- Shot memory --
    /// Time the brew switch went ON; `None` while idle.
    pub brew_start_ms: Option<u64>,

    // -- Output --
    /// Pressure to command this cycle (bar).
    pub desired_bar: f32,
}

impl BrewContext {
    pub fn new(profile: PreinfusionConfig) -> Self {
        Self {
            inputs: BrewInputs::default(),
            profile,
            brew_start_ms: None,
            desired_bar: 0.0,
        }
    }

    pub fn brewing(&self) -> bool {
        self.inputs.switch.is_on()
    }

    /// Milliseconds since the shot started, 0 when idle.
    pub fn elapsed_ms(&self) -> u64 {
        self.brew_start_ms
            .map_or(0, |start| self.inputs.now_ms.saturating_sub(start))
    }

    /// Manual pressure, with non-finite or negative UI values read as 0.
    pub fn manual_bar(&self) -> f32 {
        let bar = self.inputs.manual_bar;
        if bar.is_finite() { bar.max(0.0) } else { 0.0 }
    }
}
