//! Runtime diagnostics.
//!
//! Counters for control cycles, sensor faults, overruns and configuration
//! saves, plus a fixed-size history of the most recent sensor faults. No
//! heap; the history overwrites its oldest entry when full.

use heapless::HistoryBuffer;

/// Number of sensor faults kept in the history.
pub const FAULT_HISTORY_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultRecord {
    pub at_ms: u64,
    pub code: u8,
}

#[derive(Default)]
pub struct Diagnostics {
    cycles: u64,
    faulted_cycles: u32,
    overruns: u32,
    saves: u32,
    save_failures: u32,
    fault_history: HistoryBuffer<FaultRecord, FAULT_HISTORY_LEN>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cycle(&mut self) {
        self.cycles = self.cycles.wrapping_add(1);
    }

    pub fn record_fault(&mut self, at_ms: u64, code: u8) {
        self.faulted_cycles = self.faulted_cycles.saturating_add(1);
        self.fault_history.write(FaultRecord { at_ms, code });
    }

    pub fn record_overrun(&mut self) {
        self.overruns = self.overruns.saturating_add(1);
    }

    pub fn record_save(&mut self, ok: bool) {
        if ok {
            self.saves = self.saves.saturating_add(1);
        } else {
            self.save_failures = self.save_failures.saturating_add(1);
        }
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Cycles whose temperature sample carried a fault code.
    pub fn faulted_cycles(&self) -> u32 {
        self.faulted_cycles
    }

    pub fn overruns(&self) -> u32 {
        self.overruns
    }

    pub fn saves(&self) -> u32 {
        self.saves
    }

    pub fn save_failures(&self) -> u32 {
        self.save_failures
    }

    pub fn last_fault(&self) -> Option<FaultRecord> {
        self.fault_history.recent().copied()
    }

    /// Fault history, oldest first.
    pub fn recent_faults(&self) -> heapless::Vec<FaultRecord, FAULT_HISTORY_LEN> {
        self.fault_history.oldest_ordered().copied().collect()
    }
}
