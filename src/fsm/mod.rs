//! Function-pointer finite state machine engine driving the brew sequence.
//!
//! Classic embedded FSM pattern:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  PhaseTable                                                      │
//! │  ┌─────────────────┬───────────┬──────────┬───────────────────┐  │
//! │  │ BrewPhase       │ on_enter  │ on_exit  │ on_update         │  │
//! │  ├─────────────────┼───────────┼──────────┼───────────────────┤  │
//! │  │ Idle            │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │  │
//! │  │ ManualBrew      │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  │ AutoPreinfusion │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  │ AutoSoak        │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  │ AutoBrewing     │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  └─────────────────┴───────────┴──────────┴───────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** phase.
//! If it returns `Some(next)`, the engine runs `on_exit` for the current
//! phase, then `on_enter` for the next, and updates the current pointer.
//!
//! [`BrewSequencer`] wraps the engine with its context and forwards exactly
//! one pressure command to the pump per cycle.

pub mod context;
pub mod states;

use context::{BrewContext, BrewInputs};
use log::info;

use crate::app::ports::PumpPort;
use crate::config::PreinfusionConfig;

// ---------------------------------------------------------------------------
// Phase identity
// ---------------------------------------------------------------------------

/// Brew phases. Must stay in sync with [`states::build_phase_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BrewPhase {
    #[default]
    Idle = 0,
    ManualBrew = 1,
    AutoPreinfusion = 2,
    AutoSoak = 3,
    AutoBrewing = 4,
}

impl BrewPhase {
    /// Total number of phases — used to size the table array.
    pub const COUNT: usize = 5;

    /// Convert an index back to `BrewPhase`.  Out-of-range indices assert in
    /// debug builds and map to `Idle` (pump at 0 bar) in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::ManualBrew,
            2 => Self::AutoPreinfusion,
            3 => Self::AutoSoak,
            4 => Self::AutoBrewing,
            _ => {
                debug_assert!(false, "invalid phase index: {idx}");
                Self::Idle
            }
        }
    }

    pub fn is_brewing(self) -> bool {
        self != Self::Idle
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut BrewContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut BrewContext) -> Option<BrewPhase>;

/// Static descriptor for a single phase.
pub struct StateDescriptor {
    pub id: BrewPhase,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `BrewPhase as usize`.
    table: [StateDescriptor; BrewPhase::COUNT],
    current: usize,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; BrewPhase::COUNT], initial: BrewPhase) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter`. Call once before the first `tick()`.
    pub fn start(&mut self, ctx: &mut BrewContext) {
        info!("Brew FSM starting in phase: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance by one cycle: `on_update`, then the transition it asks for.
    pub fn tick(&mut self, ctx: &mut BrewContext) {
        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    pub fn current_phase(&self) -> BrewPhase {
        BrewPhase::from_index(self.current)
    }

    fn transition(&mut self, next_id: BrewPhase, ctx: &mut BrewContext) {
        let next_idx = next_id as usize;

        info!(
            "Brew FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}

// ---------------------------------------------------------------------------
// Brew sequencer
// ---------------------------------------------------------------------------

/// Result of one sequencer cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrewStep {
    pub phase: BrewPhase,
    /// Pressure forwarded to the pump this cycle (bar).
    pub desired_bar: f32,
    pub brew_start_ms: Option<u64>,
    /// `(from, to)` when the phase changed this cycle.
    pub transition: Option<(BrewPhase, BrewPhase)>,
    /// Length of the shot that ended this cycle.
    pub finished_shot_ms: Option<u64>,
}

pub struct BrewSequencer {
    fsm: Fsm,
    ctx: BrewContext,
}

impl BrewSequencer {
    pub fn new(profile: PreinfusionConfig) -> Self {
        let mut fsm = Fsm::new(states::build_phase_table(), BrewPhase::Idle);
        let mut ctx = BrewContext::new(profile);
        fsm.start(&mut ctx);
        Self { fsm, ctx }
    }

    /// Run one cycle and command the pump with the resulting pressure.
    pub fn step<P: PumpPort + ?Sized>(
        &mut self,
        inputs: BrewInputs,
        profile: &PreinfusionConfig,
        pump: &mut P,
    ) -> BrewStep {
        self.ctx.inputs = inputs;
        self.ctx.profile = *profile;

        let from = self.fsm.current_phase();
        let started = self.ctx.brew_start_ms;
        self.fsm.tick(&mut self.ctx);
        let to = self.fsm.current_phase();

        pump.set_desired_pressure(self.ctx.desired_bar);

        let finished_shot_ms = match (started, to) {
            (Some(start), BrewPhase::Idle) => Some(inputs.now_ms.saturating_sub(start)),
            _ => None,
        };

        BrewStep {
            phase: to,
            desired_bar: self.ctx.desired_bar,
            brew_start_ms: self.ctx.brew_start_ms,
            transition: (from != to).then_some((from, to)),
            finished_shot_ms,
        }
    }

    pub fn phase(&self) -> BrewPhase {
        self.fsm.current_phase()
    }

    pub fn brew_start_ms(&self) -> Option<u64> {
        self.ctx.brew_start_ms
    }
}
