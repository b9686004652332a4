//! Brew phase handler functions and table builder.
//!
//! Each phase is defined by plain `fn` pointers, no closures or dynamic
//! dispatch. The phase for a cycle is a pure function of the switch, the UI
//! mode, the time since the shot started and the profile
//! ([`resolve_phase`]); the handlers only decide whether that differs from
//! the current phase and which pressure to command.
//!
//! ```text
//!                    ┌─[manual]──▶ MANUAL_BREW
//!  IDLE ──[switch ON]┤
//!    ▲               └─[auto]────▶ PREINFUSION ──[t ≥ duration]──▶ SOAK
//!    │                                                               │
//!    │                                             [t ≥ duration + soak]
//!    │                                                               ▼
//!    └──────────────[switch OFF, any phase]──────────────────── BREWING
//!
//!  MANUAL_BREW ◀──[UI page change]──▶ auto phase for the elapsed time
//! ```

use super::context::{BrewContext, BrewMode};
use super::{BrewPhase, StateDescriptor};
use crate::config::PreinfusionConfig;
use log::info;

/// Phase for the given inputs. `elapsed_ms` is measured from the brew
/// switch's OFF→ON edge.
pub fn resolve_phase(
    brewing: bool,
    mode: BrewMode,
    elapsed_ms: u64,
    profile: &PreinfusionConfig,
) -> BrewPhase {
    if !brewing {
        return BrewPhase::Idle;
    }
    match mode {
        BrewMode::Manual => BrewPhase::ManualBrew,
        BrewMode::Automatic if elapsed_ms < profile.preinfusion_end_ms() => {
            BrewPhase::AutoPreinfusion
        }
        BrewMode::Automatic if elapsed_ms < profile.soak_end_ms() => BrewPhase::AutoSoak,
        BrewMode::Automatic => BrewPhase::AutoBrewing,
    }
}

fn next_phase(ctx: &BrewContext) -> BrewPhase {
    resolve_phase(
        ctx.brewing(),
        ctx.inputs.mode,
        ctx.elapsed_ms(),
        &ctx.profile,
    )
}

/// Stay in `current` (returning `None`) or report where to go.
fn transition_from(current: BrewPhase, ctx: &BrewContext) -> Option<BrewPhase> {
    let next = next_phase(ctx);
    (next != current).then_some(next)
}

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static phase table.  Called once at startup.
pub fn build_phase_table() -> [StateDescriptor; BrewPhase::COUNT] {
    [
        // Index 0 — Idle
        StateDescriptor {
            id: BrewPhase::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: Some(idle_exit),
            on_update: idle_update,
        },
        // Index 1 — ManualBrew
        StateDescriptor {
            id: BrewPhase::ManualBrew,
            name: "ManualBrew",
            on_enter: Some(manual_enter),
            on_exit: None,
            on_update: manual_update,
        },
        // Index 2 — AutoPreinfusion
        StateDescriptor {
            id: BrewPhase::AutoPreinfusion,
            name: "Preinfusion",
            on_enter: Some(preinfusion_enter),
            on_exit: None,
            on_update: preinfusion_update,
        },
        // Index 3 — AutoSoak
        StateDescriptor {
            id: BrewPhase::AutoSoak,
            name: "Soak",
            on_enter: Some(soak_enter),
            on_exit: None,
            on_update: soak_update,
        },
        // Index 4 — AutoBrewing
        StateDescriptor {
            id: BrewPhase::AutoBrewing,
            name: "Brewing",
            on_enter: Some(brewing_enter),
            on_exit: None,
            on_update: brewing_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE — pump at 0 bar, no shot in progress
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut BrewContext) {
    ctx.brew_start_ms = None;
    ctx.desired_bar = 0.0;
}

fn idle_exit(ctx: &mut BrewContext) {
    // Latch the shot start on the switch's OFF→ON edge, in either mode.
    ctx.brew_start_ms = Some(ctx.inputs.now_ms);
    info!("IDLE: shot started at {} ms", ctx.inputs.now_ms);
}

fn idle_update(ctx: &mut BrewContext) -> Option<BrewPhase> {
    if let Some(next) = transition_from(BrewPhase::Idle, ctx) {
        return Some(next);
    }
    ctx.desired_bar = 0.0;
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  MANUAL_BREW — pressure follows the UI every cycle
// ═══════════════════════════════════════════════════════════════════════════

fn manual_enter(ctx: &mut BrewContext) {
    ctx.desired_bar = ctx.manual_bar();
}

fn manual_update(ctx: &mut BrewContext) -> Option<BrewPhase> {
    if let Some(next) = transition_from(BrewPhase::ManualBrew, ctx) {
        return Some(next);
    }
    ctx.desired_bar = ctx.manual_bar();
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  PREINFUSION — low pressure wetting of the puck
// ═══════════════════════════════════════════════════════════════════════════

fn preinfusion_enter(ctx: &mut BrewContext) {
    ctx.desired_bar = ctx.profile.preinfusion_bar;
    info!(
        "PREINFUSION: {:.1} bar for {}s",
        ctx.profile.preinfusion_bar, ctx.profile.duration_secs
    );
}

fn preinfusion_update(ctx: &mut BrewContext) -> Option<BrewPhase> {
    if let Some(next) = transition_from(BrewPhase::AutoPreinfusion, ctx) {
        return Some(next);
    }
    ctx.desired_bar = ctx.profile.preinfusion_bar;
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  SOAK — zero pressure dwell
// ═══════════════════════════════════════════════════════════════════════════

fn soak_enter(ctx: &mut BrewContext) {
    ctx.desired_bar = 0.0;
    info!("SOAK: {}s at 0 bar", ctx.profile.soak_secs);
}

fn soak_update(ctx: &mut BrewContext) -> Option<BrewPhase> {
    if let Some(next) = transition_from(BrewPhase::AutoSoak, ctx) {
        return Some(next);
    }
    ctx.desired_bar = 0.0;
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  BREWING — full extraction pressure until the switch goes off
// ═══════════════════════════════════════════════════════════════════════════

fn brewing_enter(ctx: &mut BrewContext) {
    ctx.desired_bar = ctx.profile.brewing_bar;
    info!("BREWING: {:.1} bar", ctx.profile.brewing_bar);
}

fn brewing_update(ctx: &mut BrewContext) -> Option<BrewPhase> {
    if let Some(next) = transition_from(BrewPhase::AutoBrewing, ctx) {
        return Some(next);
    }
    ctx.desired_bar = ctx.profile.brewing_bar;
    None
}
