//! Phase-control dimmer heater driver.
//!
//! ## Hardware
//!
//! Triac driven from a zero-cross detector interrupt. Every mains
//! half-cycle the ISR decides whether to fire the triac; over many
//! half-cycles the fraction fired equals `duty / 255`.
//!
//! ## Split design
//!
//! [`phase_dimmer`] returns two halves sharing one `AtomicU8`:
//!
//! ```text
//!   control loop                       zero-cross ISR
//!  ┌─────────────┐   AtomicU8 duty   ┌────────────────┐
//!  │ PhaseDimmer │ ───────────────▶  │ ZeroCrossGate  │ ──▶ triac gate
//!  │ (HeaterPort)│   Release/Acquire │ on_zero_cross()│
//!  └─────────────┘                   └────────────────┘
//! ```
//!
//! The ISR half owns its error-diffusion accumulator, so it never takes a
//! lock.

use core::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use log::debug;

use crate::app::ports::HeaterPort;

/// Create the control-loop and ISR halves of a dimmer, initially off.
pub fn phase_dimmer() -> (PhaseDimmer, ZeroCrossGate) {
    let duty = Arc::new(AtomicU8::new(0));
    (
        PhaseDimmer {
            duty: Arc::clone(&duty),
        },
        ZeroCrossGate {
            duty,
            accumulator: 0,
        },
    )
}

/// Control-loop half: publishes the commanded duty.
pub struct PhaseDimmer {
    duty: Arc<AtomicU8>,
}

impl PhaseDimmer {
    pub fn duty(&self) -> u8 {
        self.duty.load(Ordering::Acquire)
    }
}

impl HeaterPort for PhaseDimmer {
    fn begin(&mut self) {
        self.duty.store(0, Ordering::Release);
        debug!("Dimmer: armed, duty 0");
    }

    fn set_duty(&mut self, duty: u8) {
        self.duty.store(duty, Ordering::Release);
    }
}

/// ISR half: decides per half-cycle whether the triac fires.
pub struct ZeroCrossGate {
    duty: Arc<AtomicU8>,
    accumulator: u16,
}

impl ZeroCrossGate {
    /// Call once per mains zero crossing. Returns `true` when the triac
    /// should fire for this half-cycle.
    pub fn on_zero_cross(&mut self) -> bool {
        self.accumulator += u16::from(self.duty.load(Ordering::Acquire));
        if self.accumulator >= u16::from(u8::MAX) {
            self.accumulator -= u16::from(u8::MAX);
            true
        } else {
            false
        }
    }
}
