//! In-memory EEPROM image.
//!
//! Implements [`PersistencePort`] over a byte vector that starts erased
//! (every cell `0xFF`, as on a fresh part). Used by the simulator, which can
//! load and dump the image to a file, and by tests. A write-protect switch
//! and single-cell corruption let tests exercise the failure paths.

use log::warn;

use crate::app::ports::PersistencePort;
use crate::error::StorageError;

/// Size of the EEPROM emulation on the reference board.
pub const DEFAULT_CAPACITY: usize = 1024;

const ERASED: u8 = 0xFF;

pub struct EepromImage {
    cells: Vec<u8>,
    writes: u32,
    write_protected: bool,
}

impl EepromImage {
    /// A blank, fully erased image.
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: vec![ERASED; capacity],
            writes: 0,
            write_protected: false,
        }
    }

    /// Wrap an existing image (e.g. read from disk).
    pub fn from_bytes(cells: Vec<u8>) -> Self {
        Self {
            cells,
            writes: 0,
            write_protected: false,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    /// Number of successful writes since construction.
    pub fn write_count(&self) -> u32 {
        self.writes
    }

    /// Reject every subsequent write with [`StorageError::WriteFailed`].
    pub fn set_write_protect(&mut self, protected: bool) {
        self.write_protected = protected;
    }

    /// XOR `mask` into one cell, bypassing the write counter.
    pub fn corrupt(&mut self, offset: usize, mask: u8) {
        if let Some(cell) = self.cells.get_mut(offset) {
            *cell ^= mask;
        }
    }

    fn check_bounds(&self, offset: usize, len: usize) -> Result<(), StorageError> {
        match offset.checked_add(len) {
            Some(end) if end <= self.cells.len() => Ok(()),
            _ => Err(StorageError::OutOfBounds {
                offset,
                len,
                capacity: self.cells.len(),
            }),
        }
    }
}

impl Default for EepromImage {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl PersistencePort for EepromImage {
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        self.check_bounds(offset, buf.len())?;
        buf.copy_from_slice(&self.cells[offset..offset + buf.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        self.check_bounds(offset, data.len())?;
        if self.write_protected {
            warn!("EEPROM: write of {} bytes at {} rejected", data.len(), offset);
            return Err(StorageError::WriteFailed);
        }
        self.cells[offset..offset + data.len()].copy_from_slice(data);
        self.writes += 1;
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.cells.len()
    }
}
