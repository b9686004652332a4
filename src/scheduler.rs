//! Fixed-interval control cycle scheduler.
//!
//! The main loop polls as fast as it likes; a control cycle is due once
//! strictly more than the interval has passed since the last one started.
//! Polls in between only service the display.
//!
//! ```text
//!  poll  poll  poll  poll  poll  poll  poll
//!   │     │     │     │     │     │     │
//!   ▼     ▼     ▼     ▼     ▼     ▼     ▼
//!   .     .    CYCLE  .     .    CYCLE  .        (interval 100 ms)
//!  t=0   t=50  t=101             t=202
//! ```
//!
//! Boot counts as t=0, so the first cycle also waits out one interval.
//!
//! A cycle that starts more than two intervals after the previous one is
//! counted as an overrun (the loop was blocked somewhere).

/// Tracks when the last control cycle ran.
pub struct CycleScheduler {
    interval_ms: u64,
    last_cycle_ms: u64,
    started: bool,
}

impl CycleScheduler {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: u64::from(interval_ms),
            last_cycle_ms: 0,
            started: false,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn last_cycle_ms(&self) -> u64 {
        self.last_cycle_ms
    }

    /// Whether a control cycle should run at `now_ms`.
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_cycle_ms) > self.interval_ms
    }

    /// Record that a cycle ran at `now_ms`. Returns how many milliseconds
    /// past its scheduled start it ran, if it overran.
    pub fn mark_cycle(&mut self, now_ms: u64) -> Option<u64> {
        let gap = now_ms.saturating_sub(self.last_cycle_ms);
        let limit = self.interval_ms * 2;
        let overrun = (self.started && gap > limit).then(|| gap - self.interval_ms);
        self.last_cycle_ms = now_ms;
        self.started = true;
        overrun
    }
}
